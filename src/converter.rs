/*!
 * External document converter.
 *
 * The pipeline only needs one operation from the outside world: "turn this
 * file into that file", optionally with a cover image. `DocumentConverter`
 * captures that, and `EbookConvert` implements it on top of calibre's
 * `ebook-convert` command line tool.
 */

use async_trait::async_trait;
use log::{debug, error};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::errors::{ConversionError, PipelineError};

/// Common trait for document converters
///
/// Implementations convert `input` into `output`, choosing the target format
/// from the output path the same way calibre does (by extension, or an HTML
/// directory when the path has none).
#[async_trait]
pub trait DocumentConverter: Send + Sync + Debug {
    /// Location of the executable backing this converter
    fn program(&self) -> &Path;

    /// Convert `input` into `output`
    ///
    /// # Arguments
    /// * `input` - Existing source document
    /// * `output` - Path to produce
    /// * `cover` - Optional cover image to embed
    async fn convert(&self, input: &Path, output: &Path, cover: Option<&Path>) -> Result<(), ConversionError>;
}

/// calibre's `ebook-convert`
#[derive(Debug, Clone)]
pub struct EbookConvert {
    program: PathBuf,
    timeout: Duration,
}

impl EbookConvert {
    /// Look `program` up on PATH
    pub fn locate(program: &str, timeout: Duration) -> Result<Self, PipelineError> {
        let program = which::which(program)
            .map_err(|_| PipelineError::MissingTool(program.to_string()))?;
        Ok(Self::with_program(program, timeout))
    }

    /// Use an already resolved executable
    pub fn with_program(program: PathBuf, timeout: Duration) -> Self {
        Self { program, timeout }
    }

    /// Keep only lines that carry information; calibre is very chatty on stderr
    fn filter_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "Conversion options changed from defaults:",
            "Resolved conversion options",
            "calibre ",
            "InputFormatPlugin:",
            "OutputFormatPlugin:",
            "Python function terminated unexpectedly",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .collect();

        match meaningful.len() {
            0 => "no error output".to_string(),
            // Tracebacks end with the actual error
            n if n > 5 => meaningful[n - 5..].join("\n"),
            _ => meaningful.join("\n"),
        }
    }
}

#[async_trait]
impl DocumentConverter for EbookConvert {
    fn program(&self) -> &Path {
        &self.program
    }

    async fn convert(&self, input: &Path, output: &Path, cover: Option<&Path>) -> Result<(), ConversionError> {
        let mut command = Command::new(&self.program);
        command.arg(input).arg(output);
        if let Some(cover) = cover {
            command.arg("--cover").arg(cover);
        }
        command.kill_on_drop(true);

        debug!("Running {:?} {:?} -> {:?} (cover: {:?})", self.program, input, output, cover);

        let result = tokio::select! {
            result = command.output() => {
                result.map_err(|source| ConversionError::Spawn {
                    program: self.program.display().to_string(),
                    source,
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(ConversionError::Timeout { secs: self.timeout.as_secs() });
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_stderr(&stderr);
            error!("Conversion of {:?} failed: {}", input, filtered);
            return Err(ConversionError::ExitStatus {
                code: result.status.code(),
                stderr: filtered,
            });
        }

        Ok(())
    }
}
