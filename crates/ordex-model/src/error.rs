//! Configuration errors.

use thiserror::Error;

/// Invalid caller configuration. Raised before any row is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no order state selected")]
    NoStates,
    #[error("no carrier selected")]
    NoCarriers,
    #[error("unknown carrier id: {0}")]
    UnknownCarrier(String),
    #[error("{0}")]
    UnknownState(String),
    #[error("partial split quantity must be positive")]
    InvalidSplitQuantity,
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error("invoice document is empty")]
    EmptyDocument,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
