use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Highest hint level that still gets annotated (1-10)
    #[serde(default = "default_hint_level")]
    pub hint_level: u8,

    /// Output formats generated when none are given on the command line
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,

    /// Lexicon file locations
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// External converter settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Target ebook format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: EPUB
    Epub,
    // @format: Kindle KF8
    Azw3,
    // @format: Legacy Kindle
    Mobi,
    // @format: PDF
    Pdf,
    // @format: Word document
    Docx,
}

impl OutputFormat {
    /// Every supported format, in the order they are offered
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Epub,
        OutputFormat::Azw3,
        OutputFormat::Mobi,
        OutputFormat::Pdf,
        OutputFormat::Docx,
    ];

    // @returns: File extension handed to the converter
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Azw3 => "azw3",
            Self::Mobi => "mobi",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    // @returns: Uppercase name for status lines
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Epub => "EPUB",
            Self::Azw3 => "AZW3",
            Self::Mobi => "MOBI",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == normalized)
            .ok_or_else(|| anyhow!("Unsupported output format: {}", s))
    }
}

/// Locations of the stop-word list and the hint dictionary
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LexiconConfig {
    /// Plain text file, one stop word per line
    #[serde(default = "default_stop_words_path")]
    pub stop_words_path: PathBuf,

    /// CSV file with `word`, `hint_level` and `short_def` columns
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: PathBuf,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            stop_words_path: default_stop_words_path(),
            dictionary_path: default_dictionary_path(),
        }
    }
}

impl LexiconConfig {
    /// Resolve relative paths against `base_dir`
    pub fn resolved_against(&self, base_dir: &Path) -> Self {
        let resolve = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            }
        };

        Self {
            stop_words_path: resolve(&self.stop_words_path),
            dictionary_path: resolve(&self.dictionary_path),
        }
    }
}

/// External converter (calibre) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConverterConfig {
    /// Converter executable name or path, looked up on PATH
    #[serde(default = "default_converter_program")]
    pub program: String,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_converter_timeout_secs")]
    pub timeout_secs: u64,

    /// Suffix appended to the source file stem for generated books
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// File names probed for a cover image inside the HTML dump
    #[serde(default = "default_cover_names")]
    pub cover_names: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_converter_program(),
            timeout_secs: default_converter_timeout_secs(),
            output_suffix: default_output_suffix(),
            cover_names: default_cover_names(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Lowest accepted hint level
pub const MIN_HINT_LEVEL: u8 = 1;

/// Highest accepted hint level
pub const MAX_HINT_LEVEL: u8 = 10;

fn default_hint_level() -> u8 {
    5
}

fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Epub, OutputFormat::Azw3, OutputFormat::Pdf]
}

fn default_stop_words_path() -> PathBuf {
    PathBuf::from("stopwords.txt")
}

fn default_dictionary_path() -> PathBuf {
    PathBuf::from("wordwise-dict.csv")
}

fn default_converter_program() -> String {
    "ebook-convert".to_string()
}

fn default_converter_timeout_secs() -> u64 {
    600 // large PDFs take minutes in calibre
}

fn default_output_suffix() -> String {
    "-wordwised".to_string()
}

fn default_cover_names() -> Vec<String> {
    vec![
        "cover.jpg".to_string(),
        "cover.jpeg".to_string(),
        "cover.png".to_string(),
    ]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HINT_LEVEL..=MAX_HINT_LEVEL).contains(&self.hint_level) {
            return Err(ConfigError::HintLevelOutOfRange(self.hint_level).into());
        }

        if self.converter.program.trim().is_empty() {
            return Err(ConfigError::EmptyValue("converter.program").into());
        }

        if self.converter.output_suffix.is_empty() {
            return Err(ConfigError::EmptyValue("converter.output_suffix").into());
        }

        if self.lexicon.stop_words_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyValue("lexicon.stop_words_path").into());
        }

        if self.lexicon.dictionary_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyValue("lexicon.dictionary_path").into());
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            hint_level: default_hint_level(),
            formats: default_formats(),
            lexicon: LexiconConfig::default(),
            converter: ConverterConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
