/*!
 * Mock converter for testing the pipeline without calibre
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wordwise::converter::DocumentConverter;
use wordwise::errors::ConversionError;

/// One recorded `convert` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cover: Option<PathBuf>,
}

/// Converter that fakes calibre's file layout.
///
/// - `*.htmlz` outputs get a placeholder container
/// - extension-less outputs become an HTML directory holding `index.html`
/// - any other output receives a copy of the input text
///
/// Outputs are selected by extension, with `""` meaning the HTML directory.
#[derive(Debug, Clone)]
pub struct MockConverter {
    html: String,
    entry_point: Option<&'static str>,
    with_cover: bool,
    failing_extensions: Vec<&'static str>,
    silent_extensions: Vec<&'static str>,
    erroring_extensions: Vec<&'static str>,
    calls: Arc<Mutex<Vec<ConversionCall>>>,
}

impl MockConverter {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            entry_point: Some("index.html"),
            with_cover: false,
            failing_extensions: Vec::new(),
            silent_extensions: Vec::new(),
            erroring_extensions: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Write the HTML under another entry point name, or none at all
    pub fn with_entry_point(mut self, entry_point: Option<&'static str>) -> Self {
        self.entry_point = entry_point;
        self
    }

    /// Put a `cover.jpg` into the HTML dump
    pub fn with_cover(mut self) -> Self {
        self.with_cover = true;
        self
    }

    /// Exit with an error for outputs with this extension, writing nothing.
    /// `""` selects the HTML directory.
    pub fn failing_for(mut self, extension: &'static str) -> Self {
        self.failing_extensions.push(extension);
        self
    }

    /// Report success for outputs with this extension without writing them
    pub fn silent_for(mut self, extension: &'static str) -> Self {
        self.silent_extensions.push(extension);
        self
    }

    /// Write the output as usual, then exit with an error anyway
    pub fn erroring_after_write_for(mut self, extension: &'static str) -> Self {
        self.erroring_extensions.push(extension);
        self
    }

    pub fn calls(&self) -> Vec<ConversionCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DocumentConverter for MockConverter {
    fn program(&self) -> &Path {
        Path::new("/usr/bin/mock-ebook-convert")
    }

    async fn convert(&self, input: &Path, output: &Path, cover: Option<&Path>) -> Result<(), ConversionError> {
        self.calls.lock().push(ConversionCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            cover: cover.map(Path::to_path_buf),
        });

        let io_error = |e: std::io::Error| ConversionError::ExitStatus {
            code: Some(1),
            stderr: e.to_string(),
        };

        // HTML directory outputs have no extension and are keyed by ""
        let extension = output
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        let exit_error = || ConversionError::ExitStatus {
            code: Some(1),
            stderr: format!("cannot write {:?}", extension),
        };

        if self.failing_extensions.iter().any(|failing| *failing == extension) {
            return Err(exit_error());
        }
        if self.silent_extensions.iter().any(|silent| *silent == extension) {
            return Ok(());
        }

        match extension.as_str() {
            "htmlz" => {
                fs::write(output, "container").map_err(io_error)?;
            }
            "" => {
                fs::create_dir_all(output).map_err(io_error)?;
                if let Some(entry_point) = self.entry_point {
                    fs::write(output.join(entry_point), &self.html).map_err(io_error)?;
                }
                if self.with_cover {
                    fs::write(output.join("cover.jpg"), [0xFF, 0xD8, 0xFF]).map_err(io_error)?;
                }
            }
            _ => {
                let content = fs::read_to_string(input).map_err(io_error)?;
                fs::write(output, content).map_err(io_error)?;
            }
        }

        if self.erroring_extensions.iter().any(|erroring| *erroring == extension) {
            return Err(exit_error());
        }

        Ok(())
    }
}
