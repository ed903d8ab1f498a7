use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WkspError {
    Config(String),
    Validation(String),
    Serialization(String),
    Other(#[from] anyhow::Error),
}

impl Display for WkspError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            WkspError::Config(s) => write!(f, "Configuration error: {}", s),
            WkspError::Validation(s) => write!(f, "Validation error: {}", s),
            WkspError::Serialization(s) => write!(f, "Serialization error: {}", s),
            WkspError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl From<serde_json::Error> for WkspError {
    fn from(err: serde_json::Error) -> Self {
        WkspError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WkspError>;
