use serde::Serialize;

use crate::domain::configuration::{ConfigKey, SiteConfiguration};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub is_image: bool,
    pub is_secret: bool,
}

/// Configuration screen, one row per known key.
#[derive(Debug, Serialize)]
pub struct ConfigurationPageData {
    pub fields: Vec<ConfigFieldView>,
}

impl From<&SiteConfiguration> for ConfigurationPageData {
    fn from(config: &SiteConfiguration) -> Self {
        let fields = ConfigKey::ALL
            .into_iter()
            .map(|key| ConfigFieldView {
                key: key.as_str(),
                label: key.label(),
                value: if key.is_secret() {
                    String::new()
                } else {
                    config.get(key).to_string()
                },
                is_image: key.is_image(),
                is_secret: key.is_secret(),
            })
            .collect();
        Self { fields }
    }
}
