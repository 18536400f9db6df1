//! Domain aggregates exposed by the loan-desk service layer.

pub mod account;
pub mod category;
pub mod configuration;
pub mod loan_request;
pub mod product;
pub mod types;
