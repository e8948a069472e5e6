//! Samples: named, time-bounded views onto an asset.

use crate::{Asset, FallbackChain, MediaUri, SampleDeclaration, TimeCode};
use derive_getters::Getters;
use mediaref_error::SampleError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Ref of the sample covering the whole asset.
pub const COMPLETE_SAMPLE_REF: &str = "complete";

/// Fade lengths applied when a declaration leaves them out.
///
/// # Examples
///
/// ```
/// use mediaref_core::SampleDefaults;
///
/// let defaults = SampleDefaults::default();
/// assert_eq!(*defaults.fade_in_sec(), 0.3);
/// assert_eq!(*defaults.fade_out_sec(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct SampleDefaults {
    /// Fade-in in seconds
    fade_in_sec: f64,
    /// Fade-out in seconds
    fade_out_sec: f64,
}

impl SampleDefaults {
    /// Defaults with explicit fade lengths.
    pub fn new(fade_in_sec: f64, fade_out_sec: f64) -> Self {
        Self {
            fade_in_sec,
            fade_out_sec,
        }
    }
}

impl Default for SampleDefaults {
    fn default() -> Self {
        Self {
            fade_in_sec: 0.3,
            fade_out_sec: 1.0,
        }
    }
}

/// Inputs of the sample title fallback chain.
#[derive(Debug, Clone, Copy)]
pub struct SampleTitleContext<'a> {
    /// Sample ref
    pub reference: &'a str,
    /// Declared title
    pub title: Option<&'a str>,
    /// Owning asset
    pub asset: &'a Asset,
}

/// A named, time-bounded segment of exactly one asset.
///
/// # Examples
///
/// ```
/// use mediaref_core::{Asset, AssetMetadata, Sample, SampleDeclaration, SampleDefaults, MediaUri};
/// use std::sync::Arc;
///
/// let metadata = AssetMetadata::builder()
///     .reference("Bach_Toccata")
///     .kind("audio")
///     .title("Toccata d-Moll")
///     .composer("Johann Sebastian Bach")
///     .build()
///     .unwrap();
/// let uri = MediaUri::parse("ref:Bach_Toccata").unwrap();
/// let asset = Arc::new(Asset::from_metadata(&uri, metadata).unwrap());
///
/// let declaration = SampleDeclaration::builder()
///     .reference("fuge")
///     .title("Fuge")
///     .start_time("2:10")
///     .end_time("2:40")
///     .build()
///     .unwrap();
/// let sample = Sample::from_declaration(&asset, &declaration, &SampleDefaults::default()).unwrap();
///
/// assert_eq!(sample.uri().raw(), "ref:Bach_Toccata#fuge");
/// assert_eq!(*sample.start_time_sec(), 130.0);
/// assert_eq!(*sample.duration_sec(), Some(30.0));
/// assert_eq!(sample.title_safe(), "Fuge (Toccata d-Moll)");
/// assert_eq!(sample.artist_safe().as_deref(), Some("Johann Sebastian Bach"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct Sample {
    /// `{asset uri}#{ref}`
    uri: MediaUri,
    /// Cache key, `{asset key}#{ref}`
    key: String,
    /// Sample name
    reference: String,
    /// Declared title
    title: Option<String>,
    /// Owning asset
    #[serde(skip)]
    asset: Arc<Asset>,
    /// Start offset in seconds
    start_time_sec: f64,
    /// Length in seconds; `None` plays to the end of the file
    duration_sec: Option<f64>,
    /// End offset in seconds, when the length is known
    end_time_sec: Option<f64>,
    /// Fade-in in seconds
    fade_in_sec: f64,
    /// Fade-out in seconds
    fade_out_sec: f64,
    /// Display title, never empty
    title_safe: String,
    /// Composer and/or artist of the owning asset
    artist_safe: Option<String>,
    /// Shortcut chosen by the author, used verbatim
    custom_shortcut: Option<String>,
    /// `false` for samples minted from an undeclared fragment
    declared: bool,
}

impl Sample {
    /// Build a sample from its declaration.
    ///
    /// # Errors
    ///
    /// `InvalidSampleSpec` when the declaration sets both `duration` and
    /// `end_time`, contains an unreadable time code, ends before it starts,
    /// has a negative fade, or names a ref that is not a valid fragment.
    #[track_caller]
    pub fn from_declaration(
        asset: &Arc<Asset>,
        declaration: &SampleDeclaration,
        defaults: &SampleDefaults,
    ) -> Result<Self, SampleError> {
        let reference = declaration
            .reference
            .clone()
            .unwrap_or_else(|| COMPLETE_SAMPLE_REF.to_string());
        let key = format!("{}#{}", asset.key(), reference);
        let invalid = |reason: String| SampleError::invalid_spec(key.clone(), reason);

        let uri = asset
            .uri()
            .with_fragment(&reference)
            .map_err(|_| invalid(format!("'{}' is not a valid sample ref", reference)))?;

        if declaration.duration.is_some() && declaration.end_time.is_some() {
            return Err(invalid("declares both duration and end_time".to_string()));
        }

        let seconds = |code: &Option<TimeCode>| -> Result<Option<f64>, SampleError> {
            code.as_ref()
                .map(|c| c.to_seconds().map_err(|e| invalid(e.kind.to_string())))
                .transpose()
        };
        let start_time_sec = seconds(&declaration.start_time)?.unwrap_or(0.0);
        let duration_sec = match (
            seconds(&declaration.duration)?,
            seconds(&declaration.end_time)?,
        ) {
            (Some(duration), _) => Some(duration),
            (None, Some(end)) if end < start_time_sec => {
                return Err(invalid(format!(
                    "end_time {} precedes start_time {}",
                    end, start_time_sec
                )));
            }
            (None, Some(end)) => Some(end - start_time_sec),
            (None, None) => None,
        };

        let fade_in_sec = declaration.fade_in.unwrap_or(defaults.fade_in_sec);
        let fade_out_sec = declaration.fade_out.unwrap_or(defaults.fade_out_sec);
        if fade_in_sec < 0.0 || fade_out_sec < 0.0 {
            return Err(invalid("fades must not be negative".to_string()));
        }

        let title_safe = Self::title_chain()
            .resolve(&SampleTitleContext {
                reference: &reference,
                title: declaration.title.as_deref(),
                asset,
            })
            .unwrap_or_else(|| asset.title_safe().clone());
        let artist_safe = Self::artist_chain().resolve(asset.as_ref());

        Ok(Self {
            uri,
            key,
            reference,
            title: declaration.title.clone(),
            asset: Arc::clone(asset),
            start_time_sec,
            duration_sec,
            end_time_sec: duration_sec.map(|d| start_time_sec + d),
            fade_in_sec,
            fade_out_sec,
            title_safe,
            artist_safe,
            custom_shortcut: declaration.shortcut.clone(),
            declared: true,
        })
    }

    /// The `complete` sample, timed by the asset-level fields of its record.
    #[track_caller]
    pub fn complete(asset: &Arc<Asset>, defaults: &SampleDefaults) -> Result<Self, SampleError> {
        let metadata = asset.metadata();
        let declaration = SampleDeclaration {
            reference: Some(COMPLETE_SAMPLE_REF.to_string()),
            start_time: metadata.start_time.clone(),
            duration: metadata.duration.clone(),
            end_time: metadata.end_time.clone(),
            fade_in: metadata.fade_in,
            fade_out: metadata.fade_out,
            ..Default::default()
        };
        Self::from_declaration(asset, &declaration, defaults)
    }

    /// A sample for a ref the metadata never declared.
    #[track_caller]
    pub fn minted(
        asset: &Arc<Asset>,
        reference: &str,
        defaults: &SampleDefaults,
    ) -> Result<Self, SampleError> {
        let declaration = SampleDeclaration {
            reference: Some(reference.to_string()),
            ..Default::default()
        };
        let mut sample = Self::from_declaration(asset, &declaration, defaults)?;
        sample.declared = false;
        Ok(sample)
    }

    /// Every declared sample of `asset`, in `sample_refs` order.
    ///
    /// The `complete` sample is included even when not declared.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid declaration, or when two declarations
    /// share a ref.
    #[track_caller]
    pub fn declared_for(
        asset: &Arc<Asset>,
        defaults: &SampleDefaults,
    ) -> Result<Vec<Self>, SampleError> {
        let declarations = &asset.metadata().samples;
        let mut seen = HashSet::new();
        for declaration in declarations {
            let reference = declaration
                .reference
                .as_deref()
                .unwrap_or(COMPLETE_SAMPLE_REF);
            if !seen.insert(reference) {
                return Err(SampleError::invalid_spec(
                    format!("{}#{}", asset.key(), reference),
                    "sample ref declared more than once",
                ));
            }
        }

        asset
            .sample_refs()
            .iter()
            .map(|reference| {
                let declaration = declarations.iter().find(|d| {
                    d.reference.as_deref().unwrap_or(COMPLETE_SAMPLE_REF) == reference
                });
                match declaration {
                    Some(declaration) => Self::from_declaration(asset, declaration, defaults),
                    None => Self::complete(asset, defaults),
                }
            })
            .collect()
    }

    /// Title fallback chain.
    pub fn title_chain<'a>() -> FallbackChain<SampleTitleContext<'a>> {
        FallbackChain::new()
            .then("complete_uses_asset_title", complete_uses_asset_title)
            .then("declared_title", declared_title_with_asset)
            .then("ref", reference_with_asset)
    }

    /// Artist fallback chain.
    pub fn artist_chain() -> FallbackChain<Asset> {
        FallbackChain::new()
            .then("composer_and_artist", composer_and_artist)
            .then("composer", composer_only)
            .then("artist", artist_only)
    }

    /// Whether this is the sample covering the whole asset.
    pub fn is_complete(&self) -> bool {
        self.reference == COMPLETE_SAMPLE_REF
    }
}

fn complete_uses_asset_title(ctx: &SampleTitleContext<'_>) -> Option<String> {
    (ctx.reference == COMPLETE_SAMPLE_REF).then(|| ctx.asset.title_safe().clone())
}

fn declared_title_with_asset(ctx: &SampleTitleContext<'_>) -> Option<String> {
    ctx.title
        .filter(|title| !title.trim().is_empty())
        .map(|title| format!("{} ({})", title, ctx.asset.title_safe()))
}

fn reference_with_asset(ctx: &SampleTitleContext<'_>) -> Option<String> {
    Some(format!("{} ({})", ctx.reference, ctx.asset.title_safe()))
}

fn composer_and_artist(asset: &Asset) -> Option<String> {
    match (non_blank(asset.composer()), non_blank(asset.artist())) {
        (Some(composer), Some(artist)) => Some(format!("{} ({})", composer, artist)),
        _ => None,
    }
}

fn composer_only(asset: &Asset) -> Option<String> {
    non_blank(asset.composer()).map(str::to_string)
}

fn artist_only(asset: &Asset) -> Option<String> {
    non_blank(asset.artist()).map(str::to_string)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
