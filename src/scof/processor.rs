//! File processing API for scof files
//!
//! Processes a movement file or a whole archive at a chosen stage (token,
//! tree, model) and renders it in a chosen format. Format strings name both,
//! as in `token-simple` or `model-json`.
//!
//! | Format | Output |
//! |---|---|
//! | `token-simple` | raw tokens of every line |
//! | `token-json` | line records (line, depth, keyword, arguments) |
//! | `tree-treeviz` | the parse tree as a box-drawing tree |
//! | `model-json` / `model-yaml` | the object model |
//! | `model-text` | the object model written back as scof text |
//!
//! Archives (`.scof` files, or directories with the archive layout) only
//! support the model stage.
//!
//! # Sample Sources
//!
//! The [`scof_sources`] module gives tests access to the curated samples in
//! `docs/samples`, so test input lives in one place.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::scof::archive::{archive_entries, read_directory, read_path, LoadedDocument};
use crate::scof::building::build_movement;
use crate::scof::config::ScofConfig;
use crate::scof::error::ScofError;
use crate::scof::formats::{serialize_movement, to_treeviz_str};
use crate::scof::lexer::{tokenize, Tokenizer};
use crate::scof::parser::parse_with_indent;

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Tree,
    Model,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Treeviz,
    Text,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

const SPECS: &[(&str, ProcessingStage, OutputFormat)] = &[
    ("token-simple", ProcessingStage::Token, OutputFormat::Simple),
    ("token-json", ProcessingStage::Token, OutputFormat::Json),
    ("tree-treeviz", ProcessingStage::Tree, OutputFormat::Treeviz),
    ("model-json", ProcessingStage::Model, OutputFormat::Json),
    ("model-yaml", ProcessingStage::Model, OutputFormat::Yaml),
    ("model-text", ProcessingStage::Model, OutputFormat::Text),
];

impl ProcessingSpec {
    /// Parse a format string like "token-simple" or "model-json"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        match stage {
            "token" | "tree" | "model" => {}
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        }

        SPECS
            .iter()
            .find(|(name, _, _)| *name == format_str)
            .map(|&(_, stage, format)| ProcessingSpec { stage, format })
            .ok_or_else(|| {
                ProcessingError::InvalidFormatType(format!(
                    "'{}' is not supported for the {} stage",
                    format, stage
                ))
            })
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        SPECS
            .iter()
            .map(|&(_, stage, format)| ProcessingSpec { stage, format })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        SPECS
            .iter()
            .find(|(_, stage, format)| *stage == self.stage && *format == self.format)
            .map(|(name, _, _)| *name)
            .unwrap_or("unknown")
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Scof(#[from] ScofError),
}

/// Process a movement file, an archive, or an unpacked archive directory
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    config: &ScofConfig,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(ProcessingError::FileNotFound(file_path.display().to_string()));
    }

    if is_archive(file_path) {
        let loaded = load_archive(file_path, config)?;
        return process_document(loaded, spec, config);
    }

    let content = fs::read_to_string(file_path)?;
    process_source(&content, spec, config)
}

/// Whether a path names an archive rather than a single movement file
pub fn is_archive(path: &Path) -> bool {
    path.is_dir() || path.extension().map_or(false, |ext| ext == "scof")
}

/// Load an archive file or unpacked archive directory
pub fn load_archive(path: &Path, config: &ScofConfig) -> Result<LoadedDocument, ScofError> {
    if path.is_dir() {
        read_directory(path, config)
    } else {
        read_path(path, config)
    }
}

/// Process the text of one movement
pub fn process_source(
    content: &str,
    spec: &ProcessingSpec,
    config: &ScofConfig,
) -> Result<String, ProcessingError> {
    let indent_width = config.format.indent_width;
    match (spec.stage, spec.format) {
        (ProcessingStage::Token, OutputFormat::Simple) => Ok(format_tokens(content)),
        (ProcessingStage::Token, OutputFormat::Json) => {
            let records = Tokenizer::with_indent_width(content, indent_width)
                .collect::<Result<Vec<_>, _>>()?;
            to_json(&records)
        }
        (ProcessingStage::Tree, OutputFormat::Treeviz) => {
            Ok(to_treeviz_str(&parse_with_indent(content, indent_width)?))
        }
        (ProcessingStage::Model, format) => {
            let movement = build_movement(&parse_with_indent(content, indent_width)?)?;
            match format {
                OutputFormat::Json => to_json(&movement),
                OutputFormat::Yaml => to_yaml(&movement),
                OutputFormat::Text => Ok(serialize_movement(&movement, indent_width)),
                _ => Err(unsupported(spec)),
            }
        }
        _ => Err(unsupported(spec)),
    }
}

fn process_document(
    loaded: LoadedDocument,
    spec: &ProcessingSpec,
    config: &ScofConfig,
) -> Result<String, ProcessingError> {
    if spec.stage != ProcessingStage::Model {
        return Err(ProcessingError::InvalidFormatType(format!(
            "'{}' works on movement files; archives support the model stage only",
            spec.name()
        )));
    }
    let document = loaded.into_strict()?;
    match spec.format {
        OutputFormat::Json => to_json(&document),
        OutputFormat::Yaml => to_yaml(&document),
        OutputFormat::Text => {
            let mut out = String::new();
            for (name, text) in archive_entries(&document, config) {
                out.push_str(&format!("// {}\n{}", name, text));
                if !text.ends_with('\n') {
                    out.push('\n');
                }
            }
            Ok(out)
        }
        _ => Err(unsupported(spec)),
    }
}

/// One line per source line, each token in its display form
fn format_tokens(content: &str) -> String {
    let mut result = String::new();
    for line in tokenize(content) {
        for token in line {
            result.push_str(&token.to_string());
        }
        result.push('\n');
    }
    result
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ProcessingError> {
    serde_json::to_string_pretty(value).map_err(|e| ProcessingError::Serialization(e.to_string()))
}

fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String, ProcessingError> {
    serde_yaml::to_string(value).map_err(|e| ProcessingError::Serialization(e.to_string()))
}

fn unsupported(spec: &ProcessingSpec) -> ProcessingError {
    ProcessingError::InvalidFormatType(spec.name().to_string())
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    SPECS.iter().map(|(name, _, _)| name.to_string()).collect()
}

/// Sample sources for tests
pub mod scof_sources {
    use super::*;

    /// Available sample files (canonical sources)
    pub const AVAILABLE_SAMPLES: &[&str] = &[
        "010-piano.muon",
        "020-sections.muon",
        "030-measures.muon",
        "Canon in D",
    ];

    /// Main interface for accessing scof sample files
    pub struct ScofSources;

    impl ScofSources {
        /// Get the path to the samples directory
        pub fn samples_dir() -> &'static str {
            "docs/samples"
        }

        /// Get the full path to a sample
        pub fn sample_path(name: &str) -> String {
            format!("{}/{}", Self::samples_dir(), name)
        }

        /// Validate that a sample exists and is available
        fn validate_sample(name: &str) -> Result<(), ProcessingError> {
            if !AVAILABLE_SAMPLES.contains(&name) {
                return Err(ProcessingError::FileNotFound(format!(
                    "Sample '{}' is not available. Available samples: {:?}",
                    name, AVAILABLE_SAMPLES
                )));
            }
            Ok(())
        }

        /// Get sample content as raw string
        pub fn get_string(name: &str) -> Result<String, ProcessingError> {
            Self::validate_sample(name)?;
            Ok(fs::read_to_string(Self::sample_path(name))?)
        }

        /// Get sample content processed with the specified format
        pub fn get_processed(name: &str, format: &str) -> Result<String, ProcessingError> {
            Self::validate_sample(name)?;
            let spec = ProcessingSpec::from_string(format)?;
            process_file(Self::sample_path(name), &spec, &ScofConfig::default())
        }

        /// List all available samples
        pub fn list_samples() -> Vec<&'static str> {
            AVAILABLE_SAMPLES.to_vec()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_get_string_sample() {
            let content = ScofSources::get_string("010-piano.muon").unwrap();
            assert!(content.contains("T0 voice // Add voice track."));
        }

        #[test]
        fn test_validate_sample() {
            assert!(ScofSources::validate_sample("010-piano.muon").is_ok());
            assert!(ScofSources::validate_sample("invalid-sample.muon").is_err());
        }

        #[test]
        fn test_all_samples_process() {
            for sample in ScofSources::list_samples() {
                let output = ScofSources::get_processed(sample, "model-json");
                assert!(output.is_ok(), "Sample {} should load: {:?}", sample, output.err());
            }
        }
    }
}
