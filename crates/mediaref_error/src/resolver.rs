//! Resolver orchestration error types.

/// Specific error conditions raised by the resolver itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ResolverErrorKind {
    /// The cache was reset while the fetch for this key was in flight
    #[display("Resolution of {} superseded by reset (started in generation {}, now {})", key, started, current)]
    Superseded {
        /// Cache key being resolved
        key: String,
        /// Generation the fetch was started in
        started: u64,
        /// Generation at completion
        current: u64,
    },
}

/// Resolver error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Resolver Error: {} at line {} in {}", kind, line, file)]
pub struct ResolverError {
    /// The specific error condition
    pub kind: ResolverErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ResolverError {
    /// Create a new ResolverError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ResolverErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
