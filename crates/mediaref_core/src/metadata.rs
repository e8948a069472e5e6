//! Raw metadata records as returned by a metadata source.

use crate::{MediaUri, TimeCode};
use mediaref_error::MediaResult;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Metadata describing one media file.
///
/// Fields the resolver does not recognize are kept in `extra`; any string
/// in there that parses as a [`MediaUri`] is treated as a link.
///
/// # Examples
///
/// ```
/// use mediaref_core::AssetMetadata;
///
/// let metadata: AssetMetadata = serde_json::from_str(r#"{
///     "ref": "Beethoven_Fuer-Elise",
///     "uuid": "9a1d2c44-0b6e-4d0e-9a43-51a0c6a8d6f1",
///     "kind": "audio",
///     "title": "Für Elise",
///     "http_url": "http://localhost/media/Beethoven_Fuer-Elise.mp3",
///     "cover": "ref:Beethoven_Portrait",
///     "recording_year": 1962
/// }"#).unwrap();
///
/// assert_eq!(metadata.reference.as_deref(), Some("Beethoven_Fuer-Elise"));
/// assert!(metadata.extra.contains_key("recording_year"));
/// assert_eq!(metadata.link_references().unwrap()[0].raw(), "ref:Beethoven_Portrait");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into, strip_option))]
pub struct AssetMetadata {
    /// Stable human-readable identifier
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Permanent identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Declared media kind (`audio`, `video`, `image`, `document`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Explicit title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Composer of the recorded work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    /// Performing artist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Base HTTP location of the media file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,
    /// A `_preview.jpg` image exists next to the file
    #[serde(default)]
    pub has_preview: bool,
    /// A `_waveform.png` image exists next to the file (audio only)
    #[serde(default)]
    pub has_waveform: bool,
    /// Number of numbered part files, when the asset is multi-part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_part_count: Option<u32>,
    /// Reference to a cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Start of the implicit `complete` sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeCode>,
    /// Length of the implicit `complete` sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TimeCode>,
    /// End of the implicit `complete` sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeCode>,
    /// Fade-in of the implicit `complete` sample, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    /// Fade-out of the implicit `complete` sample, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
    /// Named samples inside this file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<SampleDeclaration>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl AssetMetadata {
    /// Creates a new metadata builder.
    pub fn builder() -> AssetMetadataBuilder {
        AssetMetadataBuilder::default()
    }

    /// Every reference this record links to, in the order they are followed:
    /// `cover` first, then strings found in `extra` (keys in sorted order,
    /// arrays and nested objects walked in place). Duplicates are dropped.
    ///
    /// Strings in `extra` that do not parse are ordinary values and are
    /// skipped.
    ///
    /// # Errors
    ///
    /// `InvalidUri` when `cover` is set but is not a valid reference.
    pub fn link_references(&self) -> MediaResult<Vec<MediaUri>> {
        let mut links: Vec<MediaUri> = Vec::new();
        if let Some(cover) = &self.cover {
            links.push(MediaUri::parse(cover)?);
        }

        let mut push = |candidate: &str| {
            if let Ok(uri) = MediaUri::parse(candidate)
                && !links.contains(&uri)
            {
                links.push(uri);
            }
        };
        for value in self.extra.values() {
            collect_strings(value, &mut push);
        }
        Ok(links)
    }

    /// Cache keys this record can be addressed by.
    pub fn identity_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(2);
        if let Some(reference) = &self.reference {
            keys.push(format!("ref:{}", reference));
        }
        if let Some(uuid) = &self.uuid {
            keys.push(format!("uuid:{}", uuid));
        }
        keys
    }
}

fn collect_strings(value: &JsonValue, sink: &mut impl FnMut(&str)) {
    match value {
        JsonValue::String(s) => sink(s),
        JsonValue::Array(items) => items.iter().for_each(|item| collect_strings(item, sink)),
        JsonValue::Object(map) => map.values().for_each(|item| collect_strings(item, sink)),
        _ => {}
    }
}

/// A named, time-bounded segment declared inside an asset's metadata.
///
/// # Examples
///
/// ```
/// use mediaref_core::SampleDeclaration;
///
/// let declaration = SampleDeclaration::builder()
///     .reference("chorus")
///     .title("Chorus")
///     .start_time("1:02")
///     .duration(12.5)
///     .build()
///     .unwrap();
///
/// assert_eq!(declaration.reference.as_deref(), Some("chorus"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into, strip_option))]
pub struct SampleDeclaration {
    /// Sample name; `complete` when absent
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Start offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeCode>,
    /// Length; exclusive with `end_time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TimeCode>,
    /// End offset; exclusive with `duration`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeCode>,
    /// Fade-in in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    /// Fade-out in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
    /// Keyboard shortcut chosen by the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

impl SampleDeclaration {
    /// Creates a new declaration builder.
    pub fn builder() -> SampleDeclarationBuilder {
        SampleDeclarationBuilder::default()
    }
}
