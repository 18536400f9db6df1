use thiserror::Error;

/// Message shown when the backend could not be reached at all.
pub const TRANSPORT_MESSAGE: &str = "Không thể kết nối server. Vui lòng thử lại sau!";

/// Failure classes of a backend call. The display text is what the user sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No response was received (connection refused, timeout, DNS).
    #[error("{}", TRANSPORT_MESSAGE)]
    Transport(String),

    /// The backend answered with an HTTP error or `isSuccess: false`.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected envelope.
    #[error("Dữ liệu trả về không hợp lệ: {0}")]
    Decode(String),

    /// The outgoing request could not be built.
    #[error("Không thể tạo yêu cầu: {0}")]
    Encode(String),

    /// A successful envelope carried no `result`.
    #[error("Máy chủ không trả về dữ liệu.")]
    MissingResult,

    /// The operation is not offered for this entity.
    #[error("Thao tác không được hỗ trợ.")]
    Unsupported,
}

impl GatewayError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }

    /// Whether the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Server { status: 401, .. })
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_hides_details() {
        let err = GatewayError::Transport("connection refused".into());
        assert_eq!(err.to_string(), TRANSPORT_MESSAGE);
        assert!(err.is_transport());
    }

    #[test]
    fn server_error_shows_backend_message() {
        let err = GatewayError::server(400, "Số điện thoại đã tồn tại");
        assert_eq!(err.to_string(), "Số điện thoại đã tồn tại");
        assert!(!err.is_unauthorized());
        assert!(GatewayError::server(401, "x").is_unauthorized());
    }
}
