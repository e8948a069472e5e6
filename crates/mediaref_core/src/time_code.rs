//! Time values in sample declarations.

use mediaref_error::{SampleError, SampleErrorKind};
use serde::{Deserialize, Serialize};

/// A point or length in time as written in metadata.
///
/// Either plain seconds or a string `SS[.fff]`, `MM:SS[.fff]` or
/// `HH:MM:SS[.fff]`.
///
/// # Examples
///
/// ```
/// use mediaref_core::TimeCode;
///
/// assert_eq!(TimeCode::Seconds(1.5).to_seconds().unwrap(), 1.5);
/// assert_eq!(TimeCode::Text("1:02.5".to_string()).to_seconds().unwrap(), 62.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum TimeCode {
    /// Seconds as a number
    Seconds(f64),
    /// Colon separated time code
    Text(String),
}

impl TimeCode {
    /// Value in seconds.
    ///
    /// # Errors
    ///
    /// Negative, non-finite, or malformed values yield
    /// [`SampleErrorKind::InvalidTimeCode`].
    #[track_caller]
    pub fn to_seconds(&self) -> Result<f64, SampleError> {
        match self {
            TimeCode::Seconds(seconds) if seconds.is_finite() && *seconds >= 0.0 => Ok(*seconds),
            TimeCode::Seconds(seconds) => Err(SampleError::new(SampleErrorKind::InvalidTimeCode(
                seconds.to_string(),
            ))),
            TimeCode::Text(text) => parse_time_code(text),
        }
    }
}

impl From<&str> for TimeCode {
    fn from(value: &str) -> Self {
        TimeCode::Text(value.to_string())
    }
}

/// Parse `SS[.fff]`, `MM:SS[.fff]` or `HH:MM:SS[.fff]` into seconds.
///
/// Only the leading component may exceed 59.
#[track_caller]
pub fn parse_time_code(text: &str) -> Result<f64, SampleError> {
    let invalid = || SampleError::new(SampleErrorKind::InvalidTimeCode(text.to_string()));
    let trimmed = text.trim();
    let components: Vec<&str> = trimmed.split(':').collect();
    if trimmed.is_empty() || components.len() > 3 {
        return Err(invalid());
    }

    let (leading, rest) = components.split_at(components.len() - 1);
    let seconds_text = rest[0];
    if seconds_text.is_empty() || !seconds_text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }
    let seconds: f64 = seconds_text.parse().map_err(|_| invalid())?;
    if !leading.is_empty() && seconds >= 60.0 {
        return Err(invalid());
    }

    let mut total = seconds;
    let mut multiplier = 60.0;
    for (position, component) in leading.iter().rev().enumerate() {
        if component.is_empty() || !component.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = component.parse().map_err(|_| invalid())?;
        let is_leading = position == leading.len() - 1;
        if !is_leading && value >= 60 {
            return Err(invalid());
        }
        total += f64::from(value) * multiplier;
        multiplier *= 60.0;
    }
    Ok(total)
}
