//! mediaref - media reference resolution
//!
//! Authored content points at media through opaque references such as
//! `ref:Fuge-Opfer_HB_Ricercar-a-3#complete` or
//! `uuid:c64047d2-983d-4009-a35f-02c95534cb53`. This crate resolves them into
//! fully described assets and time-coded samples, fetching each record once,
//! following the links between records, and assigning keyboard shortcuts to
//! the samples it found.
//!
//! # Quick Start
//!
//! ```rust
//! use mediaref::{InMemoryMetadataSource, MediaKind, Resolver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = InMemoryMetadataSource::from_json_str(r#"[
//!     {"ref": "Fuge-Opfer_HB_Ricercar-a-3", "kind": "audio", "start_time": 1,
//!      "samples": [{"ref": "thema", "start_time": "0:05", "duration": 12}]}
//! ]"#).await?;
//!
//! let resolver = Resolver::new(source);
//! let sample = resolver.resolve_sample("ref:Fuge-Opfer_HB_Ricercar-a-3#complete").await?;
//! assert_eq!(*sample.start_time_sec(), 1.0);
//!
//! let shortcuts = resolver.get_sample_shortcuts(MediaKind::Audio).await;
//! assert_eq!(shortcuts.labels(), vec!["a 1", "a 2"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `mediaref_error` - Error types
//! - `mediaref_core` - References, metadata records, assets and samples
//! - `mediaref_interface` - The `MetadataFetcher` trait and an in-memory source
//! - `mediaref_cache` - Discovery-ordered asset and sample caches
//! - `mediaref_resolver` - The resolver, its configuration and shortcut assignment
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use mediaref_cache::*;
pub use mediaref_core::*;
pub use mediaref_error::*;
pub use mediaref_interface::*;
pub use mediaref_resolver::*;

mod telemetry;

pub use telemetry::{init_json_telemetry, init_telemetry};
