use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::annotation::{AnnotationEngine, AnnotationOutcome, ANNOTATION_PROGRESS_SPAN};
use crate::app_config::{Config, OutputFormat, MAX_HINT_LEVEL, MIN_HINT_LEVEL};
use crate::converter::{DocumentConverter, EbookConvert};
use crate::errors::{ConfigError, ConversionError, PipelineError};
use crate::file_utils::FileManager;
use crate::lexicon::Lexicon;
use crate::reporter::{Reporter, RunEvent};

// @module: Application controller for WordWise generation

// @const: Intermediate container written by the first conversion
const DUMP_CONTAINER_NAME: &str = "book_dump.htmlz";

// @const: HTML directory written by the second conversion
const DUMP_HTML_DIR_NAME: &str = "book_dump_html";

/// Parameters of a single run, validated at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    source: PathBuf,
    hint_level: u8,
    formats: Vec<OutputFormat>,
}

impl RunConfig {
    /// Reject out-of-range hint levels and empty format sets.
    /// Duplicate formats are dropped, keeping the first occurrence.
    pub fn new(
        source: impl Into<PathBuf>,
        hint_level: u8,
        formats: impl IntoIterator<Item = OutputFormat>,
    ) -> Result<Self, ConfigError> {
        if !(MIN_HINT_LEVEL..=MAX_HINT_LEVEL).contains(&hint_level) {
            return Err(ConfigError::HintLevelOutOfRange(hint_level));
        }

        let mut unique = Vec::new();
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }
        if unique.is_empty() {
            return Err(ConfigError::NoOutputFormats);
        }

        Ok(Self {
            source: source.into(),
            hint_level,
            formats: unique,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn hint_level(&self) -> u8 {
        self.hint_level
    }

    pub fn formats(&self) -> &[OutputFormat] {
        &self.formats
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage ran; some formats may still have failed
    Completed {
        created: Vec<PathBuf>,
        failed: Vec<OutputFormat>,
    },
    /// Stopped before any output was attempted
    Aborted { reason: String },
}

impl RunOutcome {
    /// Completed with every requested format created
    pub fn is_full_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { failed, .. } if failed.is_empty())
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }
}

/// Main application controller for WordWise generation
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Start a run on its own task; events arrive on the returned receiver
    /// until the run finishes.
    pub fn spawn_run(&self, run: RunConfig) -> (JoinHandle<RunOutcome>, UnboundedReceiver<RunEvent>) {
        let (reporter, events) = Reporter::channel();
        let controller = self.clone();
        let handle = tokio::spawn(async move { controller.run(&run, &reporter).await });
        (handle, events)
    }

    /// Run the full workflow with calibre's `ebook-convert` located on PATH
    pub async fn run(&self, run: &RunConfig, reporter: &Reporter) -> RunOutcome {
        let program = self.config.converter.program.clone();
        let timeout = Duration::from_secs(self.config.converter.timeout_secs);
        self.run_with(run, reporter, || EbookConvert::locate(&program, timeout)).await
    }

    /// Run the full workflow, obtaining the converter from `locate_converter`
    /// once the source file has been checked
    pub async fn run_with<C, F>(&self, run: &RunConfig, reporter: &Reporter, locate_converter: F) -> RunOutcome
    where
        C: DocumentConverter,
        F: FnOnce() -> Result<C, PipelineError>,
    {
        let start_time = std::time::Instant::now();

        match self.execute(run, reporter, locate_converter).await {
            Ok(outcome) => {
                info!("Run finished in {}", Self::format_duration(start_time.elapsed()));
                outcome
            }
            Err(e) => {
                let reason = e.to_string();
                reporter.error(format!("Aborted before producing any output: {}", reason));
                RunOutcome::Aborted { reason }
            }
        }
    }

    async fn execute<C, F>(&self, run: &RunConfig, reporter: &Reporter, locate_converter: F) -> Result<RunOutcome, PipelineError>
    where
        C: DocumentConverter,
        F: FnOnce() -> Result<C, PipelineError>,
    {
        // Check if the input file exists
        if !FileManager::file_exists(run.source()) {
            return Err(PipelineError::MissingInput(run.source().to_path_buf()));
        }

        reporter.info(format!("Hint level: {}", run.hint_level()));

        let converter = locate_converter()?;
        reporter.info(format!("Found converter: {}", converter.program().display()));

        let lexicon = Lexicon::load(
            &self.config.lexicon.stop_words_path,
            &self.config.lexicon.dictionary_path,
        )?;
        debug!(
            "Lexicon: {} stop words, {} hint entries",
            lexicon.stop_words.len(),
            lexicon.hints.len()
        );
        if lexicon.hints.is_empty() {
            reporter.warn(format!(
                "Hint dictionary {:?} is missing or empty, no words will be annotated",
                self.config.lexicon.dictionary_path
            ));
        }

        // Fresh work directory per run, removed when dropped
        let work_dir = TempDir::new()
            .map_err(|e| PipelineError::Workspace(format!("Failed to create work directory: {}", e)))?;

        let html_file = self.extract_html(run.source(), work_dir.path(), &converter, reporter).await?;
        let html_dir = work_dir.path().join(DUMP_HTML_DIR_NAME);

        reporter.info("Annotating text...");
        let annotated = Self::annotate_file(html_file.clone(), lexicon, run.hint_level(), reporter.clone()).await?;
        reporter.info(format!(
            "Annotated {} of {} chunks",
            annotated.annotated_count, annotated.chunk_count
        ));

        let cover = FileManager::find_cover(&html_dir, &self.config.converter.cover_names);
        if let Some(cover) = &cover {
            reporter.info(format!("Using cover image: {}", cover.display()));
        }

        reporter.info("Generating requested formats...");
        let outcome = self
            .generate_formats(run, &html_file, cover.as_deref(), &converter, reporter)
            .await;

        reporter.progress(100);
        Self::report_summary(&outcome, run.formats().len(), reporter);

        Ok(outcome)
    }

    /// Source book -> intermediate container -> HTML directory; returns the entry point
    async fn extract_html<C: DocumentConverter>(
        &self,
        source: &Path,
        work_dir: &Path,
        converter: &C,
        reporter: &Reporter,
    ) -> Result<PathBuf, PipelineError> {
        let container = work_dir.join(DUMP_CONTAINER_NAME);
        let html_dir = work_dir.join(DUMP_HTML_DIR_NAME);

        reporter.info("Converting book to HTML...");

        // calibre can exit non-zero after writing usable output, so only the
        // entry point decides whether extraction worked
        let mut last_error = None;
        for (input, output) in [(source, container.as_path()), (container.as_path(), html_dir.as_path())] {
            if let Err(e) = converter.convert(input, output, None).await {
                reporter.warn(format!("Converter reported an error for {}: {}", output.display(), e));
                last_error = Some(e);
            }
        }

        FileManager::find_html_entry_point(&html_dir).ok_or_else(|| {
            let detail = match last_error {
                Some(e) => e.to_string(),
                None => format!("no index.html or index1.html in {:?}", html_dir),
            };
            PipelineError::ExtractionFailure(detail)
        })
    }

    /// Annotate the HTML file in place, off the async workers
    async fn annotate_file(
        html_file: PathBuf,
        lexicon: Lexicon,
        hint_level: u8,
        reporter: Reporter,
    ) -> Result<AnnotationOutcome, PipelineError> {
        tokio::task::spawn_blocking(move || -> Result<AnnotationOutcome, PipelineError> {
            let content = FileManager::read_to_string(&html_file)
                .map_err(|e| PipelineError::Workspace(format!("{:#}", e)))?;

            let engine = AnnotationEngine::new(&lexicon, hint_level);
            let outcome = engine.annotate_with(&content, |percent| reporter.progress(percent));

            FileManager::write_to_file(&html_file, &outcome.text)
                .map_err(|e| PipelineError::Workspace(format!("{:#}", e)))?;

            Ok(outcome)
        })
        .await
        .map_err(|e| PipelineError::Workspace(format!("Annotation task failed: {}", e)))?
    }

    /// Convert the annotated HTML into every requested format, one after another
    async fn generate_formats<C: DocumentConverter>(
        &self,
        run: &RunConfig,
        html_file: &Path,
        cover: Option<&Path>,
        converter: &C,
        reporter: &Reporter,
    ) -> RunOutcome {
        let total = run.formats().len();
        let mut created = Vec::new();
        let mut failed = Vec::new();

        for (index, format) in run.formats().iter().enumerate() {
            let output_file = FileManager::generate_output_path(
                run.source(),
                &self.config.converter.output_suffix,
                format.extension(),
            );

            reporter.info(format!("Generating {}...", format.display_name()));
            match Self::convert_format(converter, html_file, &output_file, cover).await {
                Ok(()) => {
                    reporter.info(format!("Created {}", output_file.display()));
                    created.push(output_file);
                }
                Err(e) => {
                    reporter.warn(format!("Failed to create {}: {}", format.display_name(), e));
                    failed.push(*format);
                }
            }

            reporter.progress(conversion_progress(index + 1, total));
        }

        RunOutcome::Completed { created, failed }
    }

    async fn convert_format<C: DocumentConverter>(
        converter: &C,
        html_file: &Path,
        output_file: &Path,
        cover: Option<&Path>,
    ) -> Result<(), ConversionError> {
        // A leftover file from an earlier run must not pass for fresh output
        if let Err(e) = FileManager::remove_if_exists(output_file) {
            debug!("Could not remove stale output: {:#}", e);
        }

        converter.convert(html_file, output_file, cover).await?;

        if !FileManager::file_exists(output_file) {
            return Err(ConversionError::MissingOutput(output_file.to_path_buf()));
        }
        Ok(())
    }

    fn report_summary(outcome: &RunOutcome, requested: usize, reporter: &Reporter) {
        let RunOutcome::Completed { created, failed } = outcome else {
            return;
        };

        if failed.is_empty() {
            reporter.info(format!("Done! Created {} of {} formats", created.len(), requested));
            return;
        }

        let failed_names = failed
            .iter()
            .map(|format| format.extension())
            .collect::<Vec<_>>()
            .join(", ");

        if created.is_empty() {
            reporter.error(format!("Finished without output: every format failed ({})", failed_names));
        } else {
            reporter.warn(format!(
                "Finished with partial success: created {} of {} formats, failed: {}",
                created.len(),
                requested,
                failed_names
            ));
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Overall progress after `done` of `total` formats: 50..=100, linear
pub fn conversion_progress(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let span = 100 - ANNOTATION_PROGRESS_SPAN;
    (ANNOTATION_PROGRESS_SPAN + done.min(total) * span / total) as u8
}
