//! Configuration loader for the scof toolchain.
//!
//! `defaults/scof.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ScofConfig`].
//!
//! The set of archive entries a score must carry is still an open part of the
//! format, so it lives here rather than in code.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/scof.default.toml");

/// Top-level configuration consumed by scof applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ScofConfig {
    pub format: FormatConfig,
    pub archive: ArchiveConfig,
}

/// Text-format knobs shared by the tokenizer and the serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    pub indent_width: usize,
}

/// Archive layout and loading policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub movement_dir: String,
    pub extension: String,
    pub metadata_entry: String,
    pub reserved_entries: Vec<String>,
    pub required_entries: Vec<String>,
    pub min_movements: usize,
    pub strict_entries: bool,
    pub parallel: bool,
    pub compression: Compression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compression {
    Stored,
    Deflated,
}

impl ScofConfig {
    /// Reject values the text format cannot honor.
    fn check(&self) -> Result<(), ConfigError> {
        if self.format.indent_width == 0 {
            return Err(ConfigError::Message(
                "format.indent_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl ArchiveConfig {
    /// Archive entry name for a movement called `name`.
    pub fn movement_entry(&self, name: &str) -> String {
        format!("{}/{}.{}", self.movement_dir, name, self.extension)
    }

    /// Movement name for an entry inside the movement directory, if it is one.
    pub fn movement_name<'a>(&self, entry: &'a str) -> Option<&'a str> {
        let rest = entry.strip_prefix(self.movement_dir.as_str())?;
        let rest = rest.strip_prefix('/')?;
        let name = rest.strip_suffix(self.extension.as_str())?;
        let name = name.strip_suffix('.')?;
        if name.is_empty() || name.contains('/') {
            None
        } else {
            Some(name)
        }
    }

    pub fn is_reserved(&self, entry: &str) -> bool {
        self.reserved_entries.iter().any(|reserved| reserved == entry)
    }
}

impl Default for ScofConfig {
    fn default() -> Self {
        // The embedded defaults are checked by `loads_default_config`.
        load_defaults().unwrap_or_else(|_| ScofConfig {
            format: FormatConfig { indent_width: 4 },
            archive: ArchiveConfig {
                movement_dir: "Movement".to_string(),
                extension: "muon".to_string(),
                metadata_entry: "Meta.muon".to_string(),
                reserved_entries: vec!["Style.muon".to_string(), "Synth.muon".to_string()],
                required_entries: Vec::new(),
                min_movements: 1,
                strict_entries: false,
                parallel: true,
                compression: Compression::Deflated,
            },
        })
    }
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
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and check the resulting configuration.
    pub fn build(self) -> Result<ScofConfig, ConfigError> {
        let config: ScofConfig = self.builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ScofConfig, ConfigError> {
    Loader::new().build()
}
