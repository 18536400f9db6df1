//! Value objects for backend identifiers, names and phone numbers.
//!
//! Each wrapper trims its input and rejects blanks on construction, so code
//! past the form and wire layers never re-validates.
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Pattern accepted for customer phone numbers.
pub const PHONE_PATTERN: &str = r"^[0-9+()\s-]{7,20}$";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"));

/// Why a raw value was refused by one of the wrappers below.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Blank after trimming.
    #[error("value cannot be empty")]
    EmptyString,
    /// Rejected by a wrapper-specific check.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not match the accepted pattern.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Requested page size is not one of the offered sizes.
    #[error("unsupported page size: {0}")]
    InvalidPageSize(usize),
}

/// Trimmed text that is never blank.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims `value`; blank input is an error.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Trimmed text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps into the owned text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trims `value`; blank input is an error.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Trimmed text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwraps into the owned text.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    RequestCode,
    "Opaque code the backend assigns to a submitted loan request."
);

non_empty_string_newtype!(
    CategoryId,
    "Opaque identifier of a product category."
);

non_empty_string_newtype!(ProductId, "Opaque identifier of a loan product.");

non_empty_string_newtype!(
    CategoryName,
    "Product category name enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    ProductName,
    "Loan product name enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    UserName,
    "Back-office account name enforcing trimmed, non-empty values."
);

/// Phone number accepted by the loan request form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Trims the input and checks it against [`PHONE_PATTERN`].
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !PHONE_RE.is_match(trimmed) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Soft status of catalogue entities (categories, products).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActiveStatus {
    #[default]
    Active,
    Inactive,
}

impl ActiveStatus {
    /// Maps the backend `inactive` flag onto a status.
    pub const fn from_inactive(inactive: bool) -> Self {
        if inactive { Self::Inactive } else { Self::Active }
    }

    pub const fn is_inactive(self) -> bool {
        matches!(self, Self::Inactive)
    }

    /// Returns the opposite status.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

/// Review state of a submitted loan request.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    #[default]
    Pending,
    Processed,
}

impl ProcessState {
    pub const fn from_processed(processed: bool) -> Self {
        if processed { Self::Processed } else { Self::Pending }
    }

    pub const fn is_processed(self) -> bool {
        matches!(self, Self::Processed)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Processed,
            Self::Processed => Self::Pending,
        }
    }

    /// Label shown in the admin tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Chờ duyệt",
            Self::Processed => "Đã duyệt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_newtypes_trim_and_reject_blank() {
        let code = RequestCode::new("  RQ-001 ").expect("valid code");
        assert_eq!(code.as_str(), "RQ-001");
        assert_eq!(
            CategoryName::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn phone_accepts_common_formats() {
        for raw in ["0901234567", "+84 90 123 4567", "(028) 3823-4567"] {
            assert!(PhoneNumber::new(raw).is_ok(), "{raw} should be accepted");
        }
    }

    #[test]
    fn phone_rejects_letters_and_short_values() {
        assert_eq!(
            PhoneNumber::new("0901abc567"),
            Err(TypeConstraintError::InvalidPhone)
        );
        assert_eq!(
            PhoneNumber::new("12345"),
            Err(TypeConstraintError::InvalidPhone)
        );
        assert_eq!(PhoneNumber::new("  "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn statuses_toggle_back_and_forth() {
        assert_eq!(ActiveStatus::Active.toggled(), ActiveStatus::Inactive);
        assert_eq!(ActiveStatus::Inactive.toggled().toggled(), ActiveStatus::Inactive);
        assert!(ProcessState::from_processed(true).is_processed());
        assert_eq!(ProcessState::Pending.label(), "Chờ duyệt");
    }
}
