//! Form definitions backing the public and admin routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod categories;
pub mod configuration;
pub mod loan_request;
pub mod products;
pub mod requests;

/// Field carrying the encoded list query a form was posted from.
pub const RETURN_QUERY_FIELD: &str = "return_query";

/// Splits a posted list navigation form into the query it was posted from
/// and the remaining fields.
pub fn split_return_query(pairs: Vec<(String, String)>) -> (String, Vec<(String, String)>) {
    let mut return_query = String::new();
    let rest = pairs
        .into_iter()
        .filter_map(|(key, value)| {
            if key == RETURN_QUERY_FIELD {
                return_query = value;
                None
            } else {
                Some((key, value))
            }
        })
        .collect();
    (return_query, rest)
}

#[derive(Debug, Error, PartialEq)]
/// Errors that can occur when processing form data.
///
/// The display text of every variant is shown to the user as is.
pub enum FormError {
    #[error("Dữ liệu không hợp lệ: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Vui lòng nhập Họ & Tên")]
    MissingFullName,

    #[error("Vui lòng nhập SĐT")]
    MissingPhone,

    #[error("Số điện thoại không hợp lệ")]
    InvalidPhone,

    #[error("Vui lòng chọn sản phẩm")]
    MissingProduct,

    #[error("Vui lòng nhập tên")]
    InvalidName,

    #[error("Vui lòng nhập tên đăng nhập")]
    MissingUserName,

    #[error("Vui lòng nhập mật khẩu")]
    MissingPassword,

    #[error("Vui lòng nhập mật khẩu hiện tại")]
    MissingCurrentPassword,

    #[error("Vui lòng nhập mật khẩu mới")]
    MissingNewPassword,

    #[error("Vui lòng nhập lại mật khẩu mới")]
    MissingConfirmation,

    #[error("Mật khẩu xác nhận không khớp")]
    PasswordMismatch,

    #[error("Không đọc được tệp tải lên")]
    InvalidUpload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_query_is_split_from_navigation_fields() {
        let pairs = vec![
            ("phone".to_string(), "0901".to_string()),
            ("return_query".to_string(), "page=3".to_string()),
        ];
        let (return_query, rest) = split_return_query(pairs);
        assert_eq!(return_query, "page=3");
        assert_eq!(rest, vec![("phone".to_string(), "0901".to_string())]);
    }
}
