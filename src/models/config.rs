//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_api_timeout_secs() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Base URL of the REST backend, without a trailing slash.
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    /// Product attached to loan requests submitted from the generic form.
    pub default_product_id: String,
}
