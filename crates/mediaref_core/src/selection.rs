//! Numeric part selections for multi-part assets (`1-3,5`).

use mediaref_error::{MediaResult, UriError, UriErrorKind};
use regex::Regex;
use std::sync::LazyLock;

static SELECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s*(-\s*\d+\s*)?(,\s*\d+\s*(-\s*\d+\s*)?)*$")
        .expect("Valid part selection regex")
});

const MAX_RANGE_LEN: u32 = 10_000;

/// Ascending, de-duplicated, 1-based part numbers.
///
/// # Examples
///
/// ```
/// use mediaref_core::PartSelection;
///
/// let selection = PartSelection::parse("1-3, 5").unwrap();
/// assert_eq!(selection.parts(), &[1, 2, 3, 5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PartSelection {
    parts: Vec<u32>,
}

impl PartSelection {
    /// Whether `fragment` uses the numeric selection grammar at all.
    pub fn looks_like_selection(fragment: &str) -> bool {
        SELECTION.is_match(fragment)
    }

    /// Parse a comma separated list of part numbers and inclusive ranges.
    ///
    /// # Errors
    ///
    /// Rejects part `0`, descending ranges, and anything outside the grammar.
    #[track_caller]
    pub fn parse(selection: &str) -> MediaResult<Self> {
        let invalid = |reason: &str| {
            UriError::new(UriErrorKind::InvalidSelection {
                selection: selection.to_string(),
                reason: reason.to_string(),
            })
        };
        if !SELECTION.is_match(selection) {
            return Err(invalid("expected numbers or ranges such as 1-3,5").into());
        }

        let mut parts = Vec::new();
        for item in selection.split(',') {
            let (start, end) = match item.split_once('-') {
                Some((start, end)) => (start.trim(), end.trim()),
                None => (item.trim(), item.trim()),
            };
            let start: u32 = start.parse().map_err(|_| invalid("part number out of range"))?;
            let end: u32 = end.parse().map_err(|_| invalid("part number out of range"))?;
            if start == 0 {
                return Err(invalid("part numbers start at 1").into());
            }
            if start > end {
                return Err(invalid("range start exceeds range end").into());
            }
            if end - start >= MAX_RANGE_LEN {
                return Err(invalid("range too long").into());
            }
            parts.extend(start..=end);
        }
        parts.sort_unstable();
        parts.dedup();
        Ok(Self { parts })
    }

    /// Every part from 1 to `count`.
    pub fn all(count: u32) -> Self {
        Self {
            parts: (1..=count).collect(),
        }
    }

    /// Selected part numbers.
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    /// Whether part `no` is selected.
    pub fn contains(&self, no: u32) -> bool {
        self.parts.binary_search(&no).is_ok()
    }

    /// Number of selected parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
