use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PhoneNumber, ProcessState, ProductId, RequestCode};

static URL_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("split pattern is a valid regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("url pattern is a valid regex"));

/// Row of the admin request table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoanRequestSummary {
    pub request_code: RequestCode,
    pub phone: String,
    pub full_name: String,
    pub product_id: Option<String>,
    pub state: ProcessState,
    pub created_date: Option<NaiveDateTime>,
}

/// Single submitted key/value pair of a loan request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestField {
    pub key: String,
    pub value: String,
}

impl RequestField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Human readable label for the key, falling back to the raw key.
    pub fn label(&self) -> &str {
        field_label(&self.key).unwrap_or(&self.key)
    }

    /// Whether the key names an uploaded image.
    pub fn is_image(&self) -> bool {
        let key = self.key.to_lowercase();
        key.contains("image") || key.contains("hình") || key.contains("hin")
    }

    /// Absolute `http(s)` URLs found in the value.
    pub fn image_urls(&self) -> Vec<String> {
        extract_urls(&self.value)
    }
}

/// Everything the back office knows about one submitted request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoanRequestDetail {
    pub request_code: RequestCode,
    pub state: ProcessState,
    pub is_deleted: bool,
    pub fields: Vec<RequestField>,
}

/// Compressed image sent as a `DataImage[i]` multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    /// Key the backend stores the image under, e.g. `image1` or `ImgLogo`.
    pub key: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fully validated loan request ready to be sent to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct LoanRequestSubmission {
    pub phone: PhoneNumber,
    pub full_name: String,
    pub product_id: ProductId,
    /// All form fields in display order, including empty ones.
    pub fields: Vec<RequestField>,
    pub images: Vec<ImageUpload>,
}

/// Labels shown for keys the backend stores outside the form catalogue.
pub fn field_label(key: &str) -> Option<&'static str> {
    let label = match key {
        "IsSentEmail" => "Đã gửi email",
        "phone" => "Số điện thoại",
        "address" => "Địa chỉ",
        "redBookAddress" | "redbookaddress" => "Địa chỉ sổ đỏ",
        "fullname" => "Họ và tên",
        "EmailTitle" => "Tiêu đề email",
        "image1" => "Hình ảnh 1",
        "image2" => "Hình ảnh 2",
        "image3" => "Hình ảnh 3",
        "image4" => "Hình ảnh 4",
        "image5" => "Hình ảnh 5",
        _ => return None,
    };
    Some(label)
}

/// Splits `text` on whitespace and commas keeping only absolute URLs.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty() && URL_RE.is_match(part))
        .map(str::to_string)
        .collect()
}
