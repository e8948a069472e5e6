//! Metadata fetch capability for the mediaref resolver.
//!
//! The resolver never reads files or talks to servers itself. It asks a
//! [`MetadataFetcher`] for the record behind a reference and builds
//! everything else from the answer. [`InMemoryMetadataSource`] is a ready
//! made implementation backed by a map, handy for fixtures and tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod traits;

pub use memory::InMemoryMetadataSource;
pub use traits::MetadataFetcher;
