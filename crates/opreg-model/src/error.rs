use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid quarter label: {0} (expected Qn-YYYY)")]
    InvalidQuarterLabel(String),
    #[error("quarter out of range: {0} (expected 1-4)")]
    QuarterOutOfRange(u32),
}

pub type Result<T> = std::result::Result<T, ModelError>;
