use thiserror::Error;

/// Chart construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid chart configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
