//! Unified Error Model
//!
//! The reconciliation engine itself never fails; these errors belong to the
//! collaborators around it (sources, config, presenters).
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderfoldError {
    #[error("SOURCE/{0}")]
    Source(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("SERIALIZE/{0}")]
    Serialize(String),

    #[error("PRESENT/{0}")]
    Present(String),
}

impl From<serde_json::Error> for OrderfoldError {
    fn from(err: serde_json::Error) -> Self {
        OrderfoldError::Serialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for OrderfoldError {
    fn from(err: serde_yaml::Error) -> Self {
        OrderfoldError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrderfoldError>;
