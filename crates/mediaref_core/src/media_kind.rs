//! Media kind enumeration.

use serde::{Deserialize, Serialize};

/// Kind of media an asset holds.
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
pub enum MediaKind {
    /// Audio content (MP3, M4A, WAV, FLAC, etc.)
    #[display("audio")]
    Audio,
    /// Video content (MP4, WebM, MKV, etc.)
    #[display("video")]
    Video,
    /// Image content (JPEG, PNG, SVG, etc.)
    #[display("image")]
    Image,
    /// Document content (PDF)
    #[display("document")]
    Document,
}

impl MediaKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Document => "document",
        }
    }

    /// Guess the kind from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp3" | "m4a" | "aac" | "wav" | "flac" | "ogg" | "oga" | "opus" => Some(MediaKind::Audio),
            "mp4" | "m4v" | "webm" | "mkv" | "mov" | "ogv" => Some(MediaKind::Video),
            "jpg" | "jpeg" | "png" | "gif" | "svg" | "webp" | "tif" | "tiff" => {
                Some(MediaKind::Image)
            }
            "pdf" => Some(MediaKind::Document),
            _ => None,
        }
    }

    /// Audio and video can be played.
    pub fn is_playable(&self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }

    /// Images and video can be shown.
    pub fn is_visible(&self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Video)
    }

    /// Character that prefixes keyboard shortcuts for samples of this kind.
    pub fn shortcut_trigger(&self) -> char {
        match self {
            MediaKind::Audio => 'a',
            MediaKind::Video => 'v',
            MediaKind::Image => 'i',
            MediaKind::Document => 'd',
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            "image" => Ok(MediaKind::Image),
            "document" => Ok(MediaKind::Document),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}
