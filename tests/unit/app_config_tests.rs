/*!
 * Tests for configuration loading and validation
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;
use wordwise::app_config::{Config, LexiconConfig, LogLevel, OutputFormat};
use wordwise::errors::ConfigError;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.hint_level, 5);
    assert_eq!(config.formats, vec![OutputFormat::Epub, OutputFormat::Azw3, OutputFormat::Pdf]);
    assert_eq!(config.lexicon.stop_words_path, PathBuf::from("stopwords.txt"));
    assert_eq!(config.lexicon.dictionary_path, PathBuf::from("wordwise-dict.csv"));
    assert_eq!(config.converter.program, "ebook-convert");
    assert_eq!(config.converter.output_suffix, "-wordwised");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{ "hint_level": 3, "formats": ["mobi", "docx"], "converter": { "timeout_secs": 30 } }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.hint_level, 3);
    assert_eq!(config.formats, vec![OutputFormat::Mobi, OutputFormat::Docx]);
    assert_eq!(config.converter.timeout_secs, 30);
    assert_eq!(config.converter.program, "ebook-convert");
    assert_eq!(config.lexicon.dictionary_path, PathBuf::from("wordwise-dict.csv"));
}

/// Test that the default config survives a save and reload
#[test]
fn test_serialize_withDefaultConfig_shouldReloadIdentically() {
    let json = serde_json::to_string_pretty(&Config::default()).unwrap();
    assert!(json.contains("\"epub\""));

    let reloaded: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded.formats, Config::default().formats);
    assert_eq!(reloaded.converter.cover_names, Config::default().converter.cover_names);
}

/// Test that validation rejects hint levels outside 1..=10
#[test]
fn test_validate_withHintLevelOutOfRange_shouldFail() {
    for level in [0u8, 11, 255] {
        let config = Config { hint_level: level, ..Config::default() };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::HintLevelOutOfRange(level))
        );
    }
}

/// Test that validation rejects empty converter settings
#[test]
fn test_validate_withEmptyProgram_shouldFail() {
    let mut config = Config::default();
    config.converter.program = "  ".to_string();

    let err = config.validate().unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::EmptyValue("converter.program"))
    );
}

/// Test that validation rejects an empty dictionary path
#[test]
fn test_validate_withEmptyDictionaryPath_shouldFail() {
    let mut config = Config::default();
    config.lexicon.dictionary_path = PathBuf::new();

    assert!(config.validate().is_err());
}

/// Test that relative lexicon paths are resolved against the config directory
#[test]
fn test_resolvedAgainst_withMixedPaths_shouldOnlyRewriteRelativeOnes() {
    let absolute = if cfg!(windows) { PathBuf::from(r"C:\dict.csv") } else { PathBuf::from("/srv/dict.csv") };
    let lexicon = LexiconConfig {
        stop_words_path: PathBuf::from("stopwords.txt"),
        dictionary_path: absolute.clone(),
    };

    let resolved = lexicon.resolved_against(Path::new("conf"));

    assert_eq!(resolved.stop_words_path, Path::new("conf").join("stopwords.txt"));
    assert_eq!(resolved.dictionary_path, absolute);
}

/// Test parsing output formats from user input
#[test]
fn test_outputFormat_fromStr_shouldAcceptExtensionsCaseInsensitively() {
    assert_eq!(OutputFormat::from_str("epub").unwrap(), OutputFormat::Epub);
    assert_eq!(OutputFormat::from_str(".AZW3").unwrap(), OutputFormat::Azw3);
    assert_eq!(OutputFormat::from_str(" Pdf ").unwrap(), OutputFormat::Pdf);
    assert!(OutputFormat::from_str("txt").is_err());
}

/// Test format names used for files and status lines
#[test]
fn test_outputFormat_names_shouldMatchExtensionAndDisplayName() {
    assert_eq!(OutputFormat::Mobi.extension(), "mobi");
    assert_eq!(OutputFormat::Mobi.display_name(), "MOBI");
    assert_eq!(OutputFormat::Docx.to_string(), "docx");
    assert_eq!(OutputFormat::ALL.len(), 5);
}

/// Test log level mapping
#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
