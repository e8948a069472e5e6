//! Sample declaration error types.

/// Specific error conditions for sample construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SampleErrorKind {
    /// The declaration is contradictory or unreadable
    #[display("Invalid sample '{}': {}", sample, reason)]
    InvalidSampleSpec {
        /// Key of the offending sample (`{asset}#{ref}`)
        sample: String,
        /// What is wrong with it
        reason: String,
    },
    /// A time value is neither seconds nor `[[HH:]MM:]SS[.fff]`
    #[display("Invalid time code '{}'", _0)]
    InvalidTimeCode(String),
    /// The fragment names no declared sample and minting is disabled
    #[display("Sample not declared: {}", _0)]
    UndeclaredSample(String),
}

/// Error type for sample operations.
///
/// # Examples
///
/// ```
/// use mediaref_error::{SampleError, SampleErrorKind};
///
/// let err = SampleError::new(SampleErrorKind::InvalidTimeCode("1:xx".to_string()));
/// assert!(format!("{}", err).contains("1:xx"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sample Error: {} at line {} in {}", kind, line, file)]
pub struct SampleError {
    /// The specific error condition
    pub kind: SampleErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SampleError {
    /// Create a new SampleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SampleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`SampleErrorKind::InvalidSampleSpec`] error.
    #[track_caller]
    pub fn invalid_spec(sample: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(SampleErrorKind::InvalidSampleSpec {
            sample: sample.into(),
            reason: reason.into(),
        })
    }
}
