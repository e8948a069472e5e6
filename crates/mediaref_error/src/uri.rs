//! Reference string error types.

/// Kinds of reference parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UriErrorKind {
    /// The string does not match `scheme:authority[#fragment]`
    #[display("Invalid media URI '{}': {}", raw, reason)]
    InvalidUri {
        /// The rejected input
        raw: String,
        /// Which part of the grammar failed
        reason: String,
    },
    /// A fragment could not be read as a part selection such as `1-3,5`
    #[display("Invalid part selection '{}': {}", selection, reason)]
    InvalidSelection {
        /// The rejected selection
        selection: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Reference error with location tracking.
///
/// # Examples
///
/// ```
/// use mediaref_error::{UriError, UriErrorKind};
///
/// let err = UriError::new(UriErrorKind::InvalidUri {
///     raw: "http:foo".to_string(),
///     reason: "unknown scheme".to_string(),
/// });
/// assert!(format!("{}", err).contains("unknown scheme"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("URI Error: {} at line {} in {}", kind, line, file)]
pub struct UriError {
    /// The kind of error that occurred
    pub kind: UriErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UriError {
    /// Create a new reference error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UriErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`UriErrorKind::InvalidUri`] error.
    #[track_caller]
    pub fn invalid(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(UriErrorKind::InvalidUri {
            raw: raw.into(),
            reason: reason.into(),
        })
    }
}
