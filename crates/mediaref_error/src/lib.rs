//! Error types for the mediaref workspace.
//!
//! This crate provides the foundation error types used throughout the resolver.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use mediaref_error::{MediaResult, UriError, UriErrorKind};
//!
//! fn parse_reference(raw: &str) -> MediaResult<String> {
//!     Err(UriError::new(UriErrorKind::InvalidUri {
//!         raw: raw.to_string(),
//!         reason: "missing scheme".to_string(),
//!     }))?
//! }
//!
//! match parse_reference("no-scheme") {
//!     Ok(uri) => println!("Got: {}", uri),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod error;
mod fetch;
mod resolver;
mod sample;
mod uri;

pub use asset::{AssetError, AssetErrorKind};
pub use config::ConfigError;
pub use error::{MediaError, MediaErrorKind, MediaResult};
pub use fetch::FetchError;
pub use resolver::{ResolverError, ResolverErrorKind};
pub use sample::{SampleError, SampleErrorKind};
pub use uri::{UriError, UriErrorKind};
