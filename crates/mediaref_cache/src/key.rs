//! Normalised cache keys.

use mediaref_core::{Asset, MediaUri};
use serde::{Deserialize, Serialize};

/// Key under which an asset or sample is cached.
///
/// Assets use `scheme:authority`, samples `scheme:authority#ref`. The
/// authority is taken verbatim, so keys differing only in case are
/// different keys.
///
/// # Examples
///
/// ```
/// use mediaref_cache::CacheKey;
/// use mediaref_core::MediaUri;
///
/// let uri = MediaUri::parse("ref:Song#chorus").unwrap();
/// assert_eq!(CacheKey::asset(&uri).as_str(), "ref:Song");
/// assert_eq!(CacheKey::sample_of_uri(&uri).as_str(), "ref:Song#chorus");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Asset key of `uri`, fragment dropped.
    pub fn asset(uri: &MediaUri) -> Self {
        Self(uri.asset_key())
    }

    /// Key of sample `reference` of `asset`.
    pub fn sample(asset: &Asset, reference: &str) -> Self {
        Self(format!("{}#{}", asset.key(), reference))
    }

    /// Sample key spelled out by `uri` itself; `complete` when it has no fragment.
    pub fn sample_of_uri(uri: &MediaUri) -> Self {
        Self(format!(
            "{}#{}",
            uri.asset_key(),
            uri.fragment().unwrap_or(mediaref_core::COMPLETE_SAMPLE_REF)
        ))
    }

    /// String form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
