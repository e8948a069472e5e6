//! Resolved assets and their derived presentation fields.

use crate::{
    AssetMetadata, COMPLETE_SAMPLE_REF, FallbackChain, MediaKind, MediaUri, PartSelection, Scheme,
};
use derive_getters::Getters;
use mediaref_error::{AssetError, AssetErrorKind, MediaResult};
use serde::Serialize;

/// Inputs of the asset title fallback chain.
#[derive(Debug, Clone, Copy)]
pub struct AssetTitleContext<'a> {
    /// The fetched record
    pub metadata: &'a AssetMetadata,
    /// Reference the asset was requested under
    pub uri: &'a MediaUri,
}

/// A media file's metadata plus everything derived from it.
///
/// Built once per unique reference by the resolver and shared as
/// `Arc<Asset>`; never mutated afterwards.
///
/// # Examples
///
/// ```
/// use mediaref_core::{Asset, AssetMetadata, MediaKind, MediaUri};
///
/// let metadata = AssetMetadata::builder()
///     .reference("Grieg_Morgenstimmung")
///     .kind("audio")
///     .http_url("http://localhost/media/Grieg_Morgenstimmung.mp3")
///     .has_waveform(true)
///     .build()
///     .unwrap();
/// let uri = MediaUri::parse("ref:Grieg_Morgenstimmung").unwrap();
/// let asset = Asset::from_metadata(&uri, metadata).unwrap();
///
/// assert_eq!(*asset.kind(), MediaKind::Audio);
/// assert!(asset.is_playable());
/// assert_eq!(asset.title_safe(), "Grieg Morgenstimmung");
/// assert_eq!(
///     asset.waveform_http_url().as_deref(),
///     Some("http://localhost/media/Grieg_Morgenstimmung.mp3_waveform.png")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct Asset {
    /// Reference the asset was first discovered under, without fragment
    uri: MediaUri,
    /// Canonical cache key (`scheme:authority` of `uri`)
    key: String,
    /// Stable human-readable identifier
    reference: Option<String>,
    /// Permanent identifier
    uuid: Option<String>,
    /// Declared or derived media kind
    kind: MediaKind,
    /// Display title, never empty
    title_safe: String,
    /// Base HTTP location of the file
    http_url: Option<String>,
    /// File extension taken from `http_url`
    extension: Option<String>,
    /// Preview image location
    preview_http_url: Option<String>,
    /// Waveform image location (audio only)
    waveform_http_url: Option<String>,
    /// 1 for ordinary files
    multi_part_count: u32,
    /// Refs of the declared samples, `complete` included
    sample_refs: Vec<String>,
    /// The record this asset was built from
    metadata: AssetMetadata,
}

impl Asset {
    /// Build an asset from a fetched record.
    ///
    /// The identity field matching `uri`'s scheme is filled in from the
    /// authority when the record leaves it out.
    ///
    /// # Errors
    ///
    /// - [`AssetErrorKind::IdentityMismatch`] when the record names a
    ///   different identity for the requested scheme
    /// - [`AssetErrorKind::UnknownMediaKind`] when the declared kind is not
    ///   recognized, or no kind is declared and the extension says nothing
    #[track_caller]
    pub fn from_metadata(uri: &MediaUri, mut metadata: AssetMetadata) -> MediaResult<Self> {
        let uri = uri.without_fragment();
        let declared = match uri.scheme() {
            Scheme::Ref => &mut metadata.reference,
            Scheme::Uuid => &mut metadata.uuid,
        };
        if let Some(found) = declared.as_deref()
            && found != uri.authority()
        {
            return Err(AssetError::new(AssetErrorKind::IdentityMismatch {
                requested: uri.raw().to_string(),
                found: MediaUri::compose(uri.scheme(), found, None),
            })
            .into());
        }
        declared.get_or_insert_with(|| uri.authority().to_string());

        let extension = metadata.http_url.as_deref().and_then(extension_of);
        let kind = Self::derive_kind(&uri, &metadata, extension.as_deref())?;
        let title_safe = Self::title_chain()
            .resolve(&AssetTitleContext {
                metadata: &metadata,
                uri: &uri,
            })
            .unwrap_or_else(|| uri.authority().to_string());

        let preview_http_url = metadata
            .http_url
            .as_ref()
            .filter(|_| metadata.has_preview)
            .map(|url| format!("{}_preview.jpg", url));
        let waveform_http_url = metadata
            .http_url
            .as_ref()
            .filter(|_| metadata.has_waveform && kind == MediaKind::Audio)
            .map(|url| format!("{}_waveform.png", url));

        let mut sample_refs: Vec<String> = metadata
            .samples
            .iter()
            .map(|s| {
                s.reference
                    .clone()
                    .unwrap_or_else(|| COMPLETE_SAMPLE_REF.to_string())
            })
            .collect();
        if !sample_refs.iter().any(|r| r == COMPLETE_SAMPLE_REF) {
            sample_refs.insert(0, COMPLETE_SAMPLE_REF.to_string());
        }

        Ok(Self {
            key: uri.asset_key(),
            uri,
            reference: metadata.reference.clone(),
            uuid: metadata.uuid.clone(),
            kind,
            title_safe,
            http_url: metadata.http_url.clone(),
            extension,
            preview_http_url,
            waveform_http_url,
            multi_part_count: metadata.multi_part_count.unwrap_or(1).max(1),
            sample_refs,
            metadata,
        })
    }

    #[track_caller]
    fn derive_kind(
        uri: &MediaUri,
        metadata: &AssetMetadata,
        extension: Option<&str>,
    ) -> MediaResult<MediaKind> {
        let unknown = |kind: String| {
            AssetError::new(AssetErrorKind::UnknownMediaKind {
                uri: uri.raw().to_string(),
                kind,
            })
        };
        match (&metadata.kind, extension) {
            (Some(declared), _) => declared
                .trim()
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| unknown(declared.clone()).into()),
            (None, Some(extension)) => {
                let kind = MediaKind::from_extension(extension).ok_or_else(|| {
                    unknown(format!("<undeclared, extension .{}>", extension))
                })?;
                tracing::debug!(uri = %uri, extension, kind = %kind, "Media kind taken from extension");
                Ok(kind)
            }
            (None, None) => Err(unknown("<undeclared>".to_string()).into()),
        }
    }

    /// Title fallback chain: explicit title, file name, ref, uuid, authority.
    pub fn title_chain<'a>() -> FallbackChain<AssetTitleContext<'a>> {
        FallbackChain::new()
            .then("explicit_title", explicit_title)
            .then("file_name", title_from_file_name)
            .then("ref", reference_identifier)
            .then("uuid", uuid_identifier)
            .then("authority", raw_identifier)
    }

    /// Audio and video are playable.
    pub fn is_playable(&self) -> bool {
        self.kind.is_playable()
    }

    /// Images and video are visible.
    pub fn is_visible(&self) -> bool {
        self.kind.is_visible()
    }

    /// Whether the asset consists of more than one numbered file.
    pub fn is_multi_part(&self) -> bool {
        self.multi_part_count > 1
    }

    /// Location of part `no`.
    ///
    /// `no` is clamped to `[1, multi_part_count]`. An asset that is not
    /// multi-part returns its plain `http_url` for every `no`.
    pub fn multi_part_http_url_by_no(&self, no: u32) -> Option<String> {
        let url = self.http_url.as_deref()?;
        if !self.is_multi_part() {
            return Some(url.to_string());
        }
        Some(part_url(url, no.clamp(1, self.multi_part_count)))
    }

    /// Locations of the selected parts, or of every part without a selection.
    ///
    /// Part numbers beyond `multi_part_count` are skipped.
    pub fn multi_part_http_urls(&self, selection: Option<&PartSelection>) -> Vec<String> {
        let all = PartSelection::all(self.multi_part_count);
        selection
            .unwrap_or(&all)
            .parts()
            .iter()
            .filter(|no| **no <= self.multi_part_count)
            .filter_map(|no| self.multi_part_http_url_by_no(*no))
            .collect()
    }

    /// Composer of the underlying work.
    pub fn composer(&self) -> Option<&str> {
        self.metadata.composer.as_deref()
    }

    /// Performing artist.
    pub fn artist(&self) -> Option<&str> {
        self.metadata.artist.as_deref()
    }

    /// Every key this asset is cached under.
    pub fn identity_keys(&self) -> Vec<String> {
        let mut keys = self.metadata.identity_keys();
        if !keys.contains(&self.key) {
            keys.insert(0, self.key.clone());
        }
        keys
    }
}

fn explicit_title(ctx: &AssetTitleContext<'_>) -> Option<String> {
    ctx.metadata.title.clone()
}

fn title_from_file_name(ctx: &AssetTitleContext<'_>) -> Option<String> {
    let url = ctx.metadata.http_url.as_deref()?;
    let name = file_name_of(url)?;
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    Some(stem.replace('_', " "))
}

fn reference_identifier(ctx: &AssetTitleContext<'_>) -> Option<String> {
    ctx.metadata.reference.clone()
}

fn uuid_identifier(ctx: &AssetTitleContext<'_>) -> Option<String> {
    ctx.metadata.uuid.clone()
}

fn raw_identifier(ctx: &AssetTitleContext<'_>) -> Option<String> {
    Some(ctx.uri.strip_scheme().to_string())
}

fn file_name_of(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

fn extension_of(url: &str) -> Option<String> {
    file_name_of(url)
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

fn part_url(url: &str, no: u32) -> String {
    let (path, query) = match url.find(['?', '#']) {
        Some(index) => url.split_at(index),
        None => (url, ""),
    };
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = path.split_at(name_start + dot);
            format!("{}_no{:02}{}{}", stem, no, ext, query)
        }
        None => format!("{}_no{:02}{}", path, no, query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for<'a>(metadata: &'a AssetMetadata, uri: &'a MediaUri) -> AssetTitleContext<'a> {
        AssetTitleContext { metadata, uri }
    }

    #[test]
    fn explicit_title_step() {
        let uri = MediaUri::parse("ref:A").unwrap();
        let metadata = AssetMetadata {
            title: Some("Bilder einer Ausstellung".into()),
            ..Default::default()
        };
        assert_eq!(
            explicit_title(&context_for(&metadata, &uri)).as_deref(),
            Some("Bilder einer Ausstellung")
        );
        assert_eq!(explicit_title(&context_for(&AssetMetadata::default(), &uri)), None);
    }

    #[test]
    fn file_name_step_drops_extension_and_underscores() {
        let uri = MediaUri::parse("ref:A").unwrap();
        let metadata = AssetMetadata {
            http_url: Some("http://localhost/media/Ravel_Bolero.mp3?token=1".into()),
            ..Default::default()
        };
        assert_eq!(
            title_from_file_name(&context_for(&metadata, &uri)).as_deref(),
            Some("Ravel Bolero")
        );
    }

    #[test]
    fn identifier_steps() {
        let uri = MediaUri::parse("uuid:1234").unwrap();
        let metadata = AssetMetadata {
            reference: Some("Ref".into()),
            uuid: Some("1234".into()),
            ..Default::default()
        };
        let ctx = context_for(&metadata, &uri);
        assert_eq!(reference_identifier(&ctx).as_deref(), Some("Ref"));
        assert_eq!(uuid_identifier(&ctx).as_deref(), Some("1234"));
        assert_eq!(raw_identifier(&ctx).as_deref(), Some("1234"));
    }

    #[test]
    fn chain_order() {
        let names = Asset::title_chain().step_names();
        assert_eq!(names, vec!["explicit_title", "file_name", "ref", "uuid", "authority"]);
    }

    #[test]
    fn part_url_inserts_number_before_extension() {
        assert_eq!(part_url("http://h/a/Scan.jpg", 3), "http://h/a/Scan_no03.jpg");
        assert_eq!(part_url("http://h/a.b/Scan", 12), "http://h/a.b/Scan_no12");
        assert_eq!(part_url("http://h/Scan.pdf?x=1", 1), "http://h/Scan_no01.pdf?x=1");
    }

    #[test]
    fn extension_ignores_directories_with_dots() {
        assert_eq!(extension_of("http://h/v1.2/file"), None);
        assert_eq!(extension_of("http://h/file.MP3").as_deref(), Some("mp3"));
    }
}
