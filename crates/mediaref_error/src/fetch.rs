//! Metadata fetch error types.

/// Failure reported by a metadata source, with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Fetch Error: {} at line {} in {}", message, line, file)]
pub struct FetchError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl FetchError {
    /// Create a new FetchError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediaref_error::FetchError;
    ///
    /// let err = FetchError::new("metadata index unavailable");
    /// assert!(err.message.contains("unavailable"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
