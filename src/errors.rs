/*!
 * Error types for the wordwise application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the stop-word list or the hint dictionary
#[derive(Error, Debug)]
pub enum LexiconError {
    /// The file exists but could not be read
    #[error("Failed to read lexicon file {path:?}: {source}")]
    Read {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The dictionary header could not be decoded
    #[error("Failed to parse dictionary {path:?}: {source}")]
    Csv {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },
}

/// Errors raised by a single invocation of the external converter
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The converter process could not be started
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The converter ran longer than the configured limit
    #[error("Converter timed out after {secs} seconds")]
    Timeout {
        /// Configured timeout
        secs: u64,
    },

    /// The converter exited with a non-zero status
    #[error("Converter exited with status {code:?}: {stderr}")]
    ExitStatus {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Filtered standard error output
        stderr: String,
    },

    /// The converter reported success but the expected file is absent
    #[error("Expected output was not produced: {0:?}")]
    MissingOutput(PathBuf),
}

/// Unrecoverable conditions that abort a run before any output is produced
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source book does not exist
    #[error("Source file does not exist: {0:?}")]
    MissingInput(PathBuf),

    /// The external converter was not found on PATH
    #[error("Converter '{0}' was not found on PATH (is calibre installed?)")]
    MissingTool(String),

    /// No HTML could be extracted from the source book
    #[error("Failed to convert the book to HTML: {0}")]
    ExtractionFailure(String),

    /// Working files could not be created, read or written
    #[error("Working file error: {0}")]
    Workspace(String),

    /// A lexicon file exists but is unusable
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
}

/// Invalid run or configuration parameters, rejected before a run starts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Hint level outside 1..=10
    #[error("Hint level must be between 1 and 10, got {0}")]
    HintLevelOutOfRange(u8),

    /// No output format was requested
    #[error("At least one output format must be requested")]
    NoOutputFormats,

    /// A required path or name setting is empty
    #[error("Configuration value '{0}' must not be empty")]
    EmptyValue(&'static str),
}
