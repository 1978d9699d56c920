#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    /// A required field is missing or unusable at classification time.
    ///
    /// Non-retryable: the caller must re-collect the offending input. Missing
    /// *optional* data never raises this; it degrades to the absent-value
    /// display conventions instead.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ScreeningResult<T> = std::result::Result<T, ScreeningError>;
