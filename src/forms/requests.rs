use serde::Deserialize;

/// Row action on the request table.
#[derive(Debug, Deserialize)]
pub struct RequestKeyForm {
    pub request_code: String,
    #[serde(default)]
    pub return_query: String,
}

/// Query of the request detail page; `return_query` restores the table.
#[derive(Debug, Default, Deserialize)]
pub struct RequestDetailQuery {
    #[serde(default)]
    pub return_query: String,
}
