/*!
 * # WordWise - inline glossary hints for ebooks
 *
 * A Rust library that annotates the text of an ebook with short glosses
 * ("WordWise" style reading hints) and re-exports it with calibre.
 *
 * ## Features
 *
 * - Convert any book calibre can read into HTML
 * - Annotate dictionary words at or below a chosen difficulty with ruby markup
 * - Skip stop words and words harder than the chosen hint level
 * - Re-export the annotated book to EPUB, AZW3, MOBI, PDF or DOCX
 * - Report progress (0-100) and status lines through injected sinks
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `lexicon`: Stop-word list and hint dictionary loading
 * - `word_utils`: Token cleaning and literal word-boundary replacement
 * - `annotation`: The annotation pass over the extracted HTML text
 * - `converter`: External converter boundary (calibre `ebook-convert`)
 * - `app_controller`: Orchestrates a complete run
 * - `reporter`: Progress and status line sinks
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod lexicon;
pub mod word_utils;
pub mod annotation;
pub mod converter;
pub mod reporter;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, OutputFormat};
pub use annotation::{AnnotationEngine, AnnotationOutcome};
pub use app_controller::{Controller, RunConfig, RunOutcome};
pub use converter::{DocumentConverter, EbookConvert};
pub use lexicon::{HintDictionary, HintEntry, Lexicon, StopWordSet};
pub use reporter::{Reporter, RunEvent, Severity, StatusLine};
pub use word_utils::clean_word;
pub use errors::{ConfigError, ConversionError, LexiconError, PipelineError};
