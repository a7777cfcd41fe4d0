//! Shared configuration loader for the lexkit tools.
//!
//! `defaults/lexkit.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files and
//! command-line overrides on top of those defaults via [`Loader`] before deserializing
//! into [`LexkitConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use lexkit_parser::lexkit::{EncodingKind, ParseOptions};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError as LoadError;

const DEFAULT_TOML: &str = include_str!("../defaults/lexkit.default.toml");

/// Top-level configuration consumed by lexkit applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LexkitConfig {
    pub parsing: ParsingConfig,
    pub inspect: InspectConfig,
    pub input: InputConfig,
}

/// Knobs passed to every parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    pub max_recursion_depth: usize,
}

impl ParsingConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().with_max_recursion_depth(self.max_recursion_depth)
    }
}

/// Controls how parse trees are printed.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub format: OutputFormat,
    pub show_whitespace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Treeviz,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub encoding: EncodingKind,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LexkitConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LexkitConfig, ConfigError> {
    Loader::new().build()
}
