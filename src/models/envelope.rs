use serde::{Deserialize, Serialize};

use crate::gateway::errors::{GatewayError, GatewayResult};

/// Uniform wrapper around every backend response.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub is_success: bool,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: Option<String>,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    /// Message to show for a failed envelope answered with `status`.
    pub fn failure_message(&self, status: u16) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .or_else(|| match &self.error {
                Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
                    Some(text.trim().to_string())
                }
                _ => None,
            })
            .unwrap_or_else(|| format!("Request failed with status code {status}"))
    }

    /// Unwraps the envelope; `isSuccess: false` becomes a server error.
    pub fn into_result(self, http_status: u16) -> GatewayResult<Option<T>> {
        if self.is_success {
            return Ok(self.result);
        }
        let status = if self.status_code == 0 {
            http_status
        } else {
            self.status_code
        };
        let message = self.failure_message(status);
        Err(GatewayError::server(status, message))
    }

    /// Like [`Envelope::into_result`] but requires a `result`.
    pub fn into_required(self, http_status: u16) -> GatewayResult<T> {
        self.into_result(http_status)?
            .ok_or(GatewayError::MissingResult)
    }
}

/// Paged search payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total_items: Option<usize>,
}

impl<T> PagedResult<T> {
    /// Falls back to the item count when the backend omits the total.
    pub fn total(&self) -> usize {
        self.total_items.unwrap_or(self.items.len())
    }
}

/// Key/value pair used by request details and configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct KeyValueRecord {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_envelope_yields_result() {
        let envelope: Envelope<String> = serde_json::from_str(
            r#"{"isSuccess":true,"statusCode":200,"message":"","result":"abc"}"#,
        )
        .expect("valid envelope");
        assert_eq!(envelope.into_required(200), Ok("abc".to_string()));
    }

    #[test]
    fn failed_envelope_is_a_server_error_with_message() {
        let envelope: Envelope<bool> = serde_json::from_str(
            r#"{"isSuccess":false,"statusCode":400,"message":"Sai mật khẩu"}"#,
        )
        .expect("valid envelope");
        assert_eq!(
            envelope.into_result(200),
            Err(GatewayError::server(400, "Sai mật khẩu"))
        );
    }

    #[test]
    fn missing_result_is_reported() {
        let envelope: Envelope<bool> =
            serde_json::from_str(r#"{"isSuccess":true,"statusCode":200}"#).expect("valid");
        assert_eq!(envelope.into_required(200), Err(GatewayError::MissingResult));
    }

    #[test]
    fn failure_message_falls_back_to_error_then_status() {
        let envelope: Envelope<bool> = serde_json::from_str(
            r#"{"isSuccess":false,"statusCode":500,"message":"","error":"boom"}"#,
        )
        .expect("valid");
        assert_eq!(envelope.failure_message(500), "boom");
        let envelope: Envelope<bool> =
            serde_json::from_str(r#"{"isSuccess":false}"#).expect("valid");
        assert_eq!(
            envelope.into_result(502),
            Err(GatewayError::server(502, "Request failed with status code 502"))
        );
    }

    #[test]
    fn paged_total_falls_back_to_item_count() {
        let paged: PagedResult<u8> =
            serde_json::from_str(r#"{"items":[1,2,3]}"#).expect("valid");
        assert_eq!(paged.total(), 3);
    }
}
