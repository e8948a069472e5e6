//! Top-level error wrapper types.

use crate::{AssetError, ConfigError, FetchError, ResolverError, SampleError, UriError};

/// Every error condition the resolver can surface.
///
/// # Examples
///
/// ```
/// use mediaref_error::{MediaError, FetchError};
///
/// let fetch_err = FetchError::new("index offline");
/// let err: MediaError = fetch_err.into();
/// assert!(format!("{}", err).contains("Fetch Error"));
/// ```
#[derive(Debug, Clone, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MediaErrorKind {
    /// Malformed reference string
    #[from(UriError)]
    Uri(UriError),
    /// Asset lookup or construction failed
    #[from(AssetError)]
    Asset(AssetError),
    /// Sample declaration rejected
    #[from(SampleError)]
    Sample(SampleError),
    /// Metadata source failure
    #[from(FetchError)]
    Fetch(FetchError),
    /// Resolver orchestration failure
    #[from(ResolverError)]
    Resolver(ResolverError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Media error with kind discrimination.
///
/// Cheap to clone, so one failed fetch can be reported to every caller
/// that was waiting on it.
///
/// # Examples
///
/// ```
/// use mediaref_error::{MediaError, MediaErrorKind, MediaResult, ConfigError};
///
/// fn might_fail() -> MediaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), MediaErrorKind::Config(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {}", _0)]
pub struct MediaError(Box<MediaErrorKind>);

impl MediaError {
    /// Create a new error from a kind.
    pub fn new(kind: MediaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MediaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MediaErrorKind
impl<T> From<T> for MediaError
where
    T: Into<MediaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for mediaref operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;
