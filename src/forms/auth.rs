use serde::Deserialize;

use crate::domain::account::{Credentials, PasswordChange};
use crate::domain::types::UserName;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        let user_name = UserName::new(form.user_name).map_err(|_| FormError::MissingUserName)?;
        if form.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        Ok(Self {
            user_name,
            password: form.password,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// Checks the fields in display order and builds the change for
    /// `user_name`.
    pub fn into_change(self, user_name: UserName) -> Result<PasswordChange, FormError> {
        if self.current_password.is_empty() {
            return Err(FormError::MissingCurrentPassword);
        }
        if self.new_password.is_empty() {
            return Err(FormError::MissingNewPassword);
        }
        if self.confirm_password.is_empty() {
            return Err(FormError::MissingConfirmation);
        }
        if self.confirm_password != self.new_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(PasswordChange {
            user_name,
            current_password: self.current_password,
            new_password: self.new_password,
        })
    }
}
