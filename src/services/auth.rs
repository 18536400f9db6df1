//! Back-office sign in, sign out and password change.

use crate::domain::account::{AuthSession, Credentials};
use crate::domain::types::UserName;
use crate::forms::auth::{ChangePasswordForm, LoginForm};
use crate::gateway::AccountGateway;
use crate::services::{ServiceError, ServiceResult};

pub const DASHBOARD_PATH: &str = "/admin";
pub const CHANGE_PASSWORD_PATH: &str = "/admin/change-password";
pub const LOGIN_SUCCESS: &str = "Đăng nhập thành công";
pub const PASSWORD_CHANGED: &str = "Đổi mật khẩu thành công";

/// Signs in and returns the session to persist.
///
/// Backend rejections, including `401`, are reported as form errors so the
/// login page can show them.
pub async fn login<R>(gateway: &R, form: LoginForm) -> ServiceResult<AuthSession>
where
    R: AccountGateway + ?Sized,
{
    let credentials = Credentials::try_from(form)?;
    let result = gateway.login(&credentials).await.map_err(|err| {
        log::error!("Failed to sign in {}: {err}", credentials.user_name);
        ServiceError::Form(err.to_string())
    })?;
    Ok(AuthSession {
        token: result.token,
        user_name: Some(credentials.user_name.into_inner()),
        full_name: result.full_name,
    })
}

/// Tells the backend the token is no longer used. Failures are logged only;
/// the local session is cleared regardless.
pub async fn logout<R>(gateway: &R)
where
    R: AccountGateway + ?Sized,
{
    if let Err(err) = gateway.logout().await {
        log::warn!("Failed to sign out from backend: {err}");
    }
}

pub async fn change_password<R>(
    gateway: &R,
    user_name: Option<&str>,
    form: ChangePasswordForm,
) -> ServiceResult<()>
where
    R: AccountGateway + ?Sized,
{
    let user_name = user_name
        .and_then(|name| UserName::new(name).ok())
        .ok_or(ServiceError::Unauthorized)?;
    let change = form.into_change(user_name)?;
    gateway.change_password(&change).await.map_err(|err| {
        log::error!("Failed to change password for {}: {err}", change.user_name);
        err
    })?;
    Ok(())
}
