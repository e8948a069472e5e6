//! Resolver configuration.
//!
//! Settings are read from TOML with a precedence system:
//! - Bundled defaults (include_str! from mediaref.toml)
//! - User overrides (~/.config/mediaref/mediaref.toml, then ./mediaref.toml)
//! - Later sources override earlier ones field by field

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use mediaref_core::SampleDefaults;
use mediaref_error::{ConfigError, MediaError, MediaResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../mediaref.toml");

/// Tunables of a [`Resolver`](crate::Resolver).
///
/// # Example
///
/// ```
/// use mediaref_resolver::ResolverConfig;
///
/// let config = ResolverConfig::default()
///     .with_max_link_depth(2)
///     .with_default_fade_in_sec(0.0);
///
/// assert_eq!(*config.max_link_depth(), 2);
/// assert_eq!(*config.default_fade_out_sec(), 1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Links deeper than this below the requested asset are skipped
    max_link_depth: usize,
    /// Follow references found in metadata at all
    follow_links: bool,
    /// Fade-in for samples that declare none, in seconds
    default_fade_in_sec: f64,
    /// Fade-out for samples that declare none, in seconds
    default_fade_out_sec: f64,
    /// Create samples for fragments the metadata never declared
    mint_unknown_samples: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_link_depth: 32,
            follow_links: true,
            default_fade_in_sec: 0.3,
            default_fade_out_sec: 1.0,
            mint_unknown_samples: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when absent.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediaref_resolver::ResolverConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ResolverConfig::load()?;
    /// println!("Following links {} levels deep", config.max_link_depth());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> MediaResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/mediaref/mediaref.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("mediaref").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                MediaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MediaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds
    /// values [`ResolverConfig::validate`] rejects.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MediaResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MediaError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MediaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative or non-finite fades.
    #[track_caller]
    pub fn validate(&self) -> MediaResult<()> {
        for (name, value) in [
            ("default_fade_in_sec", self.default_fade_in_sec),
            ("default_fade_out_sec", self.default_fade_out_sec),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::new(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, value
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Fades handed to sample construction.
    pub fn sample_defaults(&self) -> SampleDefaults {
        SampleDefaults::new(self.default_fade_in_sec, self.default_fade_out_sec)
    }
}
