/*!
 * Tests for stop-word and hint dictionary loading
 */

use anyhow::Result;
use wordwise::errors::LexiconError;
use wordwise::lexicon::{
    load_hint_dictionary, load_stop_words, Lexicon, DEFAULT_HINT_LEVEL, MALFORMED_HINT_LEVEL,
};
use crate::common;

/// Test that missing files produce empty containers
#[test]
fn test_load_withMissingFiles_shouldReturnEmptyLexicon() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let lexicon = Lexicon::load(
        &temp_dir.path().join("stopwords.txt"),
        &temp_dir.path().join("wordwise-dict.csv"),
    )?;

    assert!(lexicon.stop_words.is_empty());
    assert!(lexicon.hints.is_empty());
    Ok(())
}

/// Test stop words are lowercased and blank lines ignored
#[test]
fn test_load_stop_words_withMixedCase_shouldLowercase() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "stopwords.txt", "The\r\nAND\n\n  of  \n")?;

    let stop_words = load_stop_words(&path)?;

    assert_eq!(stop_words.len(), 3);
    assert!(stop_words.contains("the"));
    assert!(stop_words.contains("and"));
    assert!(stop_words.contains("of"));
    assert!(!stop_words.contains("The"));
    Ok(())
}

/// Test the standard dictionary layout including a quoted gloss
#[test]
fn test_load_hint_dictionary_withQuotedComma_shouldKeepWholeGloss() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_dictionary(temp_dir.path())?;

    let dictionary = load_hint_dictionary(&path)?;

    assert_eq!(dictionary.len(), 4);
    let candid = dictionary.get("candid").unwrap();
    assert_eq!(candid.short_def, "frank, honest");
    assert_eq!(candid.hint_level, 4);
    assert_eq!(dictionary.get("ephemeral").unwrap().hint_level, 8);
    Ok(())
}

/// Test keys are lowercased while the stored word keeps its case
#[test]
fn test_load_hint_dictionary_withCapitalizedWord_shouldLookUpLowercase() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "word,hint_level,short_def\nParis,2,capital of France\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    assert!(dictionary.get("Paris").is_none());
    assert_eq!(dictionary.get("paris").unwrap().word, "Paris");
    Ok(())
}

/// Test unparsable and missing hint levels
#[test]
fn test_load_hint_dictionary_withMalformedLevels_shouldApplyFallbacks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "word,hint_level,short_def\nfoo,abc,bar\nbaz,,qux\nneg,-1,below\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    assert_eq!(dictionary.get("neg").unwrap().hint_level, -1);
    assert_eq!(dictionary.get("foo").unwrap().hint_level, MALFORMED_HINT_LEVEL);
    assert_eq!(dictionary.get("baz").unwrap().hint_level, DEFAULT_HINT_LEVEL);
    Ok(())
}

/// Test a dictionary without a hint_level column
#[test]
fn test_load_hint_dictionary_withoutHintLevelColumn_shouldUseDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "word,short_def\nlucid,clear\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    let entry = dictionary.get("lucid").unwrap();
    assert_eq!(entry.hint_level, DEFAULT_HINT_LEVEL);
    assert_eq!(entry.short_def, "clear");
    Ok(())
}

/// Test columns are matched by header name, not position
#[test]
fn test_load_hint_dictionary_withReorderedAndExtraColumns_shouldMatchByName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "short_def,source,word,hint_level\nclear,wiki,lucid,2\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    let entry = dictionary.get("lucid").unwrap();
    assert_eq!(entry.hint_level, 2);
    assert_eq!(entry.short_def, "clear");
    Ok(())
}

/// Test that later rows replace earlier ones
#[test]
fn test_load_hint_dictionary_withDuplicateWords_shouldKeepLastRow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "word,hint_level,short_def\nbank,2,river side\nBank,6,money house\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    assert_eq!(dictionary.len(), 1);
    let entry = dictionary.get("bank").unwrap();
    assert_eq!(entry.short_def, "money house");
    assert_eq!(entry.hint_level, 6);
    Ok(())
}

/// Test rows with an empty word are ignored
#[test]
fn test_load_hint_dictionary_withEmptyWord_shouldSkipRow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "word,hint_level,short_def\n,1,nothing\n  ,1,blank\nterse,3,brief\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    assert_eq!(dictionary.len(), 1);
    assert!(dictionary.get("terse").is_some());
    Ok(())
}

/// Test short rows are read with the missing fields defaulted
#[test]
fn test_load_hint_dictionary_withShortRow_shouldDefaultMissingFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "dict.csv",
        "word,hint_level,short_def\nterse,3\n",
    )?;

    let dictionary = load_hint_dictionary(&path)?;

    let entry = dictionary.get("terse").unwrap();
    assert_eq!(entry.hint_level, 3);
    assert_eq!(entry.short_def, "");
    Ok(())
}

/// Test a path that exists but cannot be read as a file
#[test]
fn test_load_stop_words_withDirectoryPath_shouldReturnReadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = load_stop_words(temp_dir.path());

    assert!(matches!(result, Err(LexiconError::Read { .. })));
    Ok(())
}
