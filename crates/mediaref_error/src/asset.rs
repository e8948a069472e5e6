//! Asset construction and lookup error types.

/// Specific error conditions raised while resolving an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// The metadata source has no record for the key
    #[display("Asset not found: {}", _0)]
    NotFound(String),
    /// The record declares a media kind outside the recognized set
    #[display("Unknown media kind '{}' for asset {}", kind, uri)]
    UnknownMediaKind {
        /// Reference of the offending asset
        uri: String,
        /// The declared (or derived) kind
        kind: String,
    },
    /// The record carries neither a `ref` nor a `uuid`
    #[display("Asset {} declares neither ref nor uuid", _0)]
    MissingIdentity(String),
    /// The record's identity disagrees with the key it was fetched for
    #[display("Asset fetched for {} identifies itself as {}", requested, found)]
    IdentityMismatch {
        /// Key passed to the metadata source
        requested: String,
        /// Identity declared by the returned record
        found: String,
    },
}

/// Asset error with location tracking.
///
/// # Examples
///
/// ```
/// use mediaref_error::{AssetError, AssetErrorKind};
///
/// let err = AssetError::new(AssetErrorKind::NotFound("ref:Missing".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new asset error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
