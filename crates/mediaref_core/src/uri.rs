//! Media reference strings: `scheme:authority[#fragment]`.

use crate::PartSelection;
use mediaref_error::{MediaError, MediaResult, UriError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static AUTHORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("Valid authority regex"));

static FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_, -]+$").expect("Valid fragment regex"));

/// Addressing mode of a media reference.
///
/// # Examples
///
/// ```
/// use mediaref_core::Scheme;
///
/// let scheme: Scheme = "uuid".parse().unwrap();
/// assert_eq!(scheme, Scheme::Uuid);
/// assert_eq!(format!("{}", Scheme::Ref), "ref");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Stable human-readable identifier
    #[display("ref")]
    Ref,
    /// Permanent UUID identifier
    #[display("uuid")]
    Uuid,
}

impl Scheme {
    /// String form used in reference strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Ref => "ref",
            Scheme::Uuid => "uuid",
        }
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ref" => Ok(Scheme::Ref),
            "uuid" => Ok(Scheme::Uuid),
            _ => Err(format!("Unknown scheme: {}", s)),
        }
    }
}

/// A parsed media reference.
///
/// Equality is structural: two references that differ only in casing are
/// different values.
///
/// # Examples
///
/// ```
/// use mediaref_core::{MediaUri, Scheme};
///
/// let uri = MediaUri::parse("ref:Fuge-Opfer_HB_Ricercar-a-3#complete").unwrap();
/// assert_eq!(uri.scheme(), Scheme::Ref);
/// assert_eq!(uri.authority(), "Fuge-Opfer_HB_Ricercar-a-3");
/// assert_eq!(uri.fragment(), Some("complete"));
/// assert_eq!(uri.without_fragment().raw(), "ref:Fuge-Opfer_HB_Ricercar-a-3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaUri {
    scheme: Scheme,
    authority: String,
    fragment: Option<String>,
    raw: String,
}

impl MediaUri {
    /// Parse a reference string.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidUri` error when the scheme is missing or unknown,
    /// the authority is empty or contains characters outside
    /// `[A-Za-z0-9._-]`, or the fragment is empty or contains characters
    /// outside letters, digits, `-`, `_`, `,` and space.
    #[track_caller]
    pub fn parse(raw: &str) -> MediaResult<Self> {
        let (scheme, rest) = raw
            .split_once(':')
            .ok_or_else(|| UriError::invalid(raw, "missing scheme separator ':'"))?;
        let scheme: Scheme = scheme
            .parse()
            .map_err(|e: String| UriError::invalid(raw, e))?;
        let (authority, fragment) = match rest.split_once('#') {
            Some((authority, fragment)) => (authority, Some(fragment)),
            None => (rest, None),
        };
        Self::new(scheme, authority, fragment).map_err(|_| {
            MediaError::from(UriError::invalid(raw, Self::describe_violation(authority, fragment)))
        })
    }

    /// Build a reference from its parts, validating each one.
    #[track_caller]
    pub fn new(scheme: Scheme, authority: &str, fragment: Option<&str>) -> MediaResult<Self> {
        let raw = Self::compose(scheme, authority, fragment);
        if !AUTHORITY.is_match(authority) {
            return Err(UriError::invalid(raw, Self::describe_violation(authority, fragment)).into());
        }
        if let Some(fragment) = fragment
            && !FRAGMENT.is_match(fragment)
        {
            return Err(UriError::invalid(raw, Self::describe_violation(authority, Some(fragment))).into());
        }
        Ok(Self {
            scheme,
            authority: authority.to_string(),
            fragment: fragment.map(str::to_string),
            raw,
        })
    }

    /// Compose a reference string; the inverse of [`MediaUri::parse`].
    ///
    /// ```
    /// use mediaref_core::{MediaUri, Scheme};
    ///
    /// assert_eq!(MediaUri::compose(Scheme::Ref, "Song", Some("chorus")), "ref:Song#chorus");
    /// assert_eq!(MediaUri::compose(Scheme::Uuid, "1234", None), "uuid:1234");
    /// ```
    pub fn compose(scheme: Scheme, authority: &str, fragment: Option<&str>) -> String {
        match fragment {
            Some(fragment) => format!("{}:{}#{}", scheme, authority, fragment),
            None => format!("{}:{}", scheme, authority),
        }
    }

    fn describe_violation(authority: &str, fragment: Option<&str>) -> &'static str {
        if authority.is_empty() {
            "empty authority"
        } else if !AUTHORITY.is_match(authority) {
            "authority may only contain letters, digits, '.', '_' and '-'"
        } else if fragment.is_some_and(str::is_empty) {
            "empty fragment"
        } else {
            "fragment may only contain letters, digits, '-', '_', ',' and spaces"
        }
    }

    /// The same reference with its fragment removed.
    pub fn without_fragment(&self) -> MediaUri {
        MediaUri {
            scheme: self.scheme,
            authority: self.authority.clone(),
            fragment: None,
            raw: Self::compose(self.scheme, &self.authority, None),
        }
    }

    /// The same reference pointing at `fragment`.
    #[track_caller]
    pub fn with_fragment(&self, fragment: &str) -> MediaResult<MediaUri> {
        Self::new(self.scheme, &self.authority, Some(fragment))
    }

    /// Bare authority, for display only.
    pub fn strip_scheme(&self) -> &str {
        &self.authority
    }

    /// Cache key of the owning asset: `scheme:authority`.
    pub fn asset_key(&self) -> String {
        Self::compose(self.scheme, &self.authority, None)
    }

    /// The fragment read as a numeric part selection, if it is one.
    pub fn part_selection(&self) -> Option<PartSelection> {
        self.fragment
            .as_deref()
            .filter(|f| PartSelection::looks_like_selection(f))
            .and_then(|f| PartSelection::parse(f).ok())
    }

    /// Addressing mode.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Identifier under the scheme.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Sample or part selector, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Canonical string form.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for MediaUri {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MediaUri {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MediaUri> for String {
    fn from(uri: MediaUri) -> Self {
        uri.raw
    }
}

impl std::fmt::Display for MediaUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
