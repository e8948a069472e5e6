//! Core data types for the mediaref resolver.
//!
//! This crate provides the plain data the resolver produces: parsed media
//! references, fetched metadata records, and the [`Asset`] and [`Sample`]
//! views derived from them. Nothing here performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod fallback;
mod media_kind;
mod metadata;
mod sample;
mod selection;
mod time_code;
mod uri;

pub use asset::{Asset, AssetTitleContext};
pub use fallback::{FallbackChain, FallbackStep};
pub use media_kind::MediaKind;
pub use metadata::{
    AssetMetadata, AssetMetadataBuilder, SampleDeclaration, SampleDeclarationBuilder,
};
pub use sample::{COMPLETE_SAMPLE_REF, Sample, SampleDefaults, SampleTitleContext};
pub use selection::PartSelection;
pub use time_code::{TimeCode, parse_time_code};
pub use uri::{MediaUri, Scheme};
