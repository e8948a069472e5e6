//! Media reference resolution.
//!
//! [`Resolver`] turns `ref:`/`uuid:` references into shared assets and
//! samples, following the links inside each record depth first. Each
//! resolver owns its caches; there is no global state.
//!
//! ## Configuration
//!
//! [`ResolverConfig::load`] layers the bundled `mediaref.toml` defaults
//! with `~/.config/mediaref/mediaref.toml` and `./mediaref.toml`:
//!
//! ```toml
//! max_link_depth = 8
//! mint_unknown_samples = false
//! ```
//!
//! ## Shortcuts
//!
//! [`Resolver::get_sample_shortcuts`] labels the samples of one media kind
//! with `a 1` … `a 9`, `a 0` (audio), `v …` (video), `i …` (image) or
//! `d …` (document), in export order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod resolver;
mod shortcuts;

pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use resolver::Resolver;
pub use shortcuts::{SampleShortcutAssigner, ShortcutTable};
