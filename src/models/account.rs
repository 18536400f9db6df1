use serde::{Deserialize, Serialize};

use crate::domain::account::LoginResult;
use crate::models::parse_backend_date;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub token: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub expire_at: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
}

impl From<LoginRecord> for LoginResult {
    fn from(record: LoginRecord) -> Self {
        Self {
            token: record.token,
            full_name: record.full_name.filter(|name| !name.is_empty()),
            expire_at: record.expire_at.as_deref().and_then(parse_backend_date),
            permission: record.permission,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload<'a> {
    pub user_name: &'a str,
    pub current_password: &'a str,
    pub new_password: &'a str,
}
