use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum GraySlabError {
    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Could not read configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GraySlabError {
    /// Name of the offending parameter, if this is a validation failure
    pub fn parameter_name(&self) -> Option<&'static str> {
        match self {
            GraySlabError::InvalidParameter { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Convenience type for `Result<T, GraySlabError>`.
pub type GraySlabResult<T> = Result<T, GraySlabError>;
