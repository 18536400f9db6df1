use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::UserName;

/// Successful login as reported by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginResult {
    pub token: String,
    pub full_name: Option<String>,
    pub expire_at: Option<NaiveDateTime>,
    pub permission: Option<String>,
}

/// Credentials posted to the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user_name: UserName,
    pub password: String,
}

/// Password change request for the signed-in account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordChange {
    pub user_name: UserName,
    pub current_password: String,
    pub new_password: String,
}

/// Authentication state kept for a browser.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl AuthSession {
    /// Name shown in the admin header.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.user_name.as_deref())
            .unwrap_or("")
    }
}
