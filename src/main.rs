// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use wordwise::app_config::{self, Config, OutputFormat, MAX_HINT_LEVEL, MIN_HINT_LEVEL};
use wordwise::{Controller, RunConfig, RunEvent, RunOutcome, Severity};

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Epub,
    Azw3,
    Mobi,
    Pdf,
    Docx,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Epub => OutputFormat::Epub,
            CliOutputFormat::Azw3 => OutputFormat::Azw3,
            CliOutputFormat::Mobi => OutputFormat::Mobi,
            CliOutputFormat::Pdf => OutputFormat::Pdf,
            CliOutputFormat::Docx => OutputFormat::Docx,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate a book and export it (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for wordwise
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Book to annotate (any format calibre can read)
    #[arg(value_name = "BOOK")]
    book: Option<PathBuf>,

    /// Annotate words whose hint level is at or below this value (1-10)
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u8).range(MIN_HINT_LEVEL as i64..=MAX_HINT_LEVEL as i64))]
    hint_level: Option<u8>,

    /// Output format; repeat or separate with commas
    #[arg(short, long = "format", value_enum, value_delimiter = ',')]
    formats: Vec<CliOutputFormat>,

    /// Stop-word file (one word per line)
    #[arg(long, value_name = "PATH")]
    stop_words: Option<PathBuf>,

    /// Hint dictionary CSV (word, hint_level, short_def)
    #[arg(long, value_name = "PATH")]
    dictionary: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// WordWise - inline glossary hints for ebooks
///
/// Converts a book to HTML with calibre, wraps dictionary words in ruby
/// annotations carrying a short definition, and exports the result.
#[derive(Parser, Debug)]
#[command(name = "wordwise")]
#[command(version)]
#[command(about = "Add WordWise-style glossary hints to ebooks")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "wordwise converts a book to HTML with calibre's ebook-convert, annotates
dictionary words with short definitions and exports the annotated book.

EXAMPLES:
    wordwise book.epub                          # Use formats and hint level from config
    wordwise -H 3 book.epub                     # Only annotate words up to hint level 3
    wordwise -f epub,azw3 book.mobi             # Export EPUB and AZW3 only
    wordwise --dictionary my-dict.csv book.epub # Use another hint dictionary
    wordwise completions bash > wordwise.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Relative lexicon paths in the config file are
    resolved against the directory that contains it.

OUTPUT:
    One file per format is written next to the book, named
    <book name>-wordwised.<format>.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything up to trace is let through; the effective level is set
    // with log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "wordwise", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => run_generate(cli.generate).await,
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let book = options.book.clone().ok_or_else(|| {
        anyhow!("BOOK is required when no subcommand is specified")
    })?;

    let config = load_config(&options)?;

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let formats: Vec<OutputFormat> = if options.formats.is_empty() {
        config.formats.clone()
    } else {
        options.formats.iter().cloned().map(OutputFormat::from).collect()
    };

    // Rejected here, before anything is converted
    let run = RunConfig::new(book, config.hint_level, formats)
        .context("Invalid run parameters")?;

    let controller = Controller::with_config(config);
    let outcome = run_with_progress(&controller, run).await?;

    match outcome {
        RunOutcome::Aborted { .. } => {
            // The reason was already reported as a status line
            std::process::exit(1);
        }
        RunOutcome::Completed { created, failed } => {
            if !failed.is_empty() {
                warn!("{} of {} formats could not be created", failed.len(), created.len() + failed.len());
            }
            for path in &created {
                info!("Success: {}", path.display());
            }
            Ok(())
        }
    }
}

/// Run the pipeline on its own task while this task renders progress and status lines
async fn run_with_progress(controller: &Controller, run: RunConfig) -> Result<RunOutcome> {
    let (handle, mut events) = controller.spawn_run(run);

    let progress_bar = ProgressBar::new(100);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}% {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));

    // The channel closes once the run task drops its reporter
    while let Some(event) = events.recv().await {
        match event {
            RunEvent::Progress(percent) => progress_bar.set_position(u64::from(percent)),
            RunEvent::Log(line) => progress_bar.suspend(|| match line.severity {
                Severity::Info => info!("{}", line.message),
                Severity::Warn => warn!("{}", line.message),
                Severity::Error => error!("{}", line.message),
            }),
        }
    }

    progress_bar.finish_and_clear();

    handle.await.context("WordWise run task failed")
}

/// Load the config file (creating a default one if missing) and apply CLI overrides
fn load_config(options: &GenerateArgs) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if config_path.exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path.display()))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path.display());

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path.display()))?;

        config
    };

    // Lexicon paths in the file are relative to the file itself
    let config_dir = config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    config.lexicon = config.lexicon.resolved_against(config_dir);

    // Override config with CLI options if provided
    if let Some(hint_level) = options.hint_level {
        config.hint_level = hint_level;
    }

    if let Some(stop_words) = &options.stop_words {
        config.lexicon.stop_words_path = stop_words.clone();
    }

    if let Some(dictionary) = &options.dictionary {
        config.lexicon.dictionary_path = dictionary.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
