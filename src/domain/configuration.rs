use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Site configuration key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKey {
    EmailFromName,
    EmailSend,
    EmailSendPassword,
    EmailReceive,
    EmailSmtpHost,
    EmailPort,
    #[serde(rename = "SDTSales")]
    SalesPhone,
    WebName,
    ImgLogo,
    ImgHome,
    ImgBackground,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 11] = [
        ConfigKey::EmailFromName,
        ConfigKey::EmailSend,
        ConfigKey::EmailSendPassword,
        ConfigKey::EmailReceive,
        ConfigKey::EmailSmtpHost,
        ConfigKey::EmailPort,
        ConfigKey::SalesPhone,
        ConfigKey::WebName,
        ConfigKey::ImgLogo,
        ConfigKey::ImgHome,
        ConfigKey::ImgBackground,
    ];

    /// Keys whose value is an uploaded image URL.
    pub const IMAGES: [ConfigKey; 3] = [
        ConfigKey::ImgLogo,
        ConfigKey::ImgHome,
        ConfigKey::ImgBackground,
    ];

    /// Key as stored by the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigKey::EmailFromName => "EmailFromName",
            ConfigKey::EmailSend => "EmailSend",
            ConfigKey::EmailSendPassword => "EmailSendPassword",
            ConfigKey::EmailReceive => "EmailReceive",
            ConfigKey::EmailSmtpHost => "EmailSmtpHost",
            ConfigKey::EmailPort => "EmailPort",
            ConfigKey::SalesPhone => "SDTSales",
            ConfigKey::WebName => "WebName",
            ConfigKey::ImgLogo => "ImgLogo",
            ConfigKey::ImgHome => "ImgHome",
            ConfigKey::ImgBackground => "ImgBackground",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConfigKey::EmailFromName => "Tên người gửi",
            ConfigKey::EmailSend => "Email gửi",
            ConfigKey::EmailSendPassword => "Mật khẩu email gửi",
            ConfigKey::EmailReceive => "Email nhận",
            ConfigKey::EmailSmtpHost => "SMTP host",
            ConfigKey::EmailPort => "SMTP port",
            ConfigKey::SalesPhone => "SĐT kinh doanh",
            ConfigKey::WebName => "Tên website",
            ConfigKey::ImgLogo => "Logo",
            ConfigKey::ImgHome => "Ảnh trang chủ",
            ConfigKey::ImgBackground => "Ảnh nền",
        }
    }

    pub const fn is_image(self) -> bool {
        matches!(
            self,
            ConfigKey::ImgLogo | ConfigKey::ImgHome | ConfigKey::ImgBackground
        )
    }

    pub const fn is_secret(self) -> bool {
        matches!(self, ConfigKey::EmailSendPassword)
    }
}

/// Raw configuration entry as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// Settings the public pages need, cached in the session for an hour.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebConfig {
    pub web_name: Option<String>,
    pub sales_phone: Option<String>,
    pub logo_url: Option<String>,
    pub home_image_url: Option<String>,
    pub background_image_url: Option<String>,
}

impl WebConfig {
    pub fn from_entries(entries: &[ConfigEntry]) -> Self {
        let lookup = |key: ConfigKey| {
            entries
                .iter()
                .find(|entry| entry.key == key.as_str())
                .map(|entry| entry.value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            web_name: lookup(ConfigKey::WebName),
            sales_phone: lookup(ConfigKey::SalesPhone),
            logo_url: lookup(ConfigKey::ImgLogo),
            home_image_url: lookup(ConfigKey::ImgHome),
            background_image_url: lookup(ConfigKey::ImgBackground),
        }
    }
}

/// Configuration values keyed by [`ConfigKey`]; unknown backend keys are kept
/// so that saving never drops them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteConfiguration {
    pub known: BTreeMap<&'static str, String>,
    pub extra: Vec<ConfigEntry>,
}

impl SiteConfiguration {
    pub fn from_entries(entries: Vec<ConfigEntry>) -> Self {
        let mut config = Self::default();
        for entry in entries {
            match ConfigKey::parse(&entry.key) {
                Some(key) => {
                    config.known.insert(key.as_str(), entry.value);
                }
                None => config.extra.push(entry),
            }
        }
        config
    }

    pub fn get(&self, key: ConfigKey) -> &str {
        self.known.get(key.as_str()).map_or("", String::as_str)
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.known.insert(key.as_str(), value.into());
    }

    /// All entries in catalogue order followed by unknown keys.
    pub fn entries(&self) -> Vec<ConfigEntry> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| ConfigEntry {
                key: key.as_str().to_string(),
                value: self.get(key).to_string(),
            })
            .chain(self.extra.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str) -> ConfigEntry {
        ConfigEntry {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn web_config_picks_public_keys() {
        let config = WebConfig::from_entries(&[
            entry("WebName", "PVG"),
            entry("SDTSales", " 1900 1234 "),
            entry("ImgLogo", ""),
        ]);
        assert_eq!(config.web_name.as_deref(), Some("PVG"));
        assert_eq!(config.sales_phone.as_deref(), Some("1900 1234"));
        assert_eq!(config.logo_url, None);
    }

    #[test]
    fn site_configuration_keeps_unknown_keys() {
        let mut config = SiteConfiguration::from_entries(vec![
            entry("WebName", "PVG"),
            entry("Legacy", "1"),
        ]);
        config.set(ConfigKey::EmailPort, "587");
        let entries = config.entries();
        assert_eq!(entries.len(), ConfigKey::ALL.len() + 1);
        assert_eq!(entries[5], entry("EmailPort", "587"));
        assert_eq!(entries.last(), Some(&entry("Legacy", "1")));
    }
}
