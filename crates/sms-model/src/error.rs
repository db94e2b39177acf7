use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("utc offset out of range: {0} minutes")]
    InvalidUtcOffset(i32),
}

pub type Result<T> = std::result::Result<T, ModelError>;
