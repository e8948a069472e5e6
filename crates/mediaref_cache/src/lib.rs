//! Asset and sample caches.
//!
//! Both caches remember the order entries were first registered in and hand
//! out shared `Arc`s, so repeated lookups of the same reference are
//! pointer-equal. The asset cache also carries the generation counter that
//! lets a resolver recognize work started before the last clear.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset_cache;
mod key;
mod sample_cache;

pub use asset_cache::AssetCache;
pub use key::CacheKey;
pub use sample_cache::SampleCache;
