use serde::{Deserialize, Serialize};

use crate::domain::configuration::ConfigEntry;
use crate::models::envelope::KeyValueRecord;

/// Payload of `/api/configuration/getall`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConfigurationRecord {
    #[serde(default)]
    pub data: Vec<KeyValueRecord>,
}

impl From<ConfigurationRecord> for Vec<ConfigEntry> {
    fn from(record: ConfigurationRecord) -> Self {
        record
            .data
            .into_iter()
            .map(|item| ConfigEntry {
                key: item.key,
                value: item.value.unwrap_or_default(),
            })
            .collect()
    }
}

/// Element of the `dataJson` part sent to `/api/configuration/save`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigEntryPayload<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> From<&'a ConfigEntry> for ConfigEntryPayload<'a> {
    fn from(entry: &'a ConfigEntry) -> Self {
        Self {
            key: &entry.key,
            value: &entry.value,
        }
    }
}
