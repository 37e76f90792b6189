use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while converting content trees to text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Conversion error: {message}")]
    Conversion { message: String },
}

impl ModelError {
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }
}
