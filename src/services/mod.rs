//! Use cases invoked by the routes. Services talk to the backend through the
//! gateway traits and never touch HTTP request/response types.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::gateway::GatewayError;

pub mod auth;
pub mod categories;
pub mod configuration;
pub mod dashboard;
pub mod loan_request;
pub mod news;
pub mod products;
pub mod requests;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// User input was rejected; the message is shown as is.
    #[error("{0}")]
    Form(String),
    #[error(transparent)]
    Gateway(GatewayError),
    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        if err.is_unauthorized() {
            ServiceError::Unauthorized
        } else {
            ServiceError::Gateway(err)
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_gateway_errors_become_unauthorized() {
        let err = ServiceError::from(GatewayError::server(401, "Hết phiên đăng nhập"));
        assert!(matches!(err, ServiceError::Unauthorized));
        let err = ServiceError::from(GatewayError::server(500, "Lỗi"));
        assert_eq!(err.to_string(), "Lỗi");
    }

    #[test]
    fn form_errors_keep_their_message() {
        let err = ServiceError::from(FormError::InvalidPhone);
        assert_eq!(err.to_string(), "Số điện thoại không hợp lệ");
    }
}
