use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error("invalid colour '{0}': expected #rrggbb")]
    InvalidColor(String),
    #[error("unknown section: {0}")]
    UnknownSection(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
