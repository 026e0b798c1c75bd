/*!
 * Stop-word list and hint dictionary.
 *
 * Both are loaded from flat files once per run and never mutated afterwards.
 * A missing file yields an empty container, which simply means nothing is
 * filtered (stop words) or nothing can be annotated (dictionary).
 */

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::errors::LexiconError;

/// Hint level used when the `hint_level` column is absent or empty
pub const DEFAULT_HINT_LEVEL: i64 = 5;

/// Hint level given to rows whose `hint_level` cannot be parsed.
/// It is above every accepted threshold, so such words are never annotated.
pub const MALFORMED_HINT_LEVEL: i64 = i64::MAX;

/// Lowercased words that are never annotated
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn contains(&self, lowercase_word: &str) -> bool {
        self.words.contains(lowercase_word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopWordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }
}

/// A single dictionary row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintEntry {
    /// Word as stored in the dictionary, case preserved
    pub word: String,

    /// Difficulty rating, lower is simpler
    pub hint_level: i64,

    /// Gloss shown next to the word
    pub short_def: String,
}

impl HintEntry {
    pub fn new(word: impl Into<String>, hint_level: i64, short_def: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            hint_level,
            short_def: short_def.into(),
        }
    }
}

/// Lowercased word to hint entry. Later rows replace earlier ones with the same key.
#[derive(Debug, Clone, Default)]
pub struct HintDictionary {
    entries: HashMap<String, HintEntry>,
}

impl HintDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry keyed by its lowercased word
    pub fn insert(&mut self, entry: HintEntry) -> Option<HintEntry> {
        self.entries.insert(entry.word.to_lowercase(), entry)
    }

    pub fn get(&self, lowercase_word: &str) -> Option<&HintEntry> {
        self.entries.get(lowercase_word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<HintEntry> for HintDictionary {
    fn from_iter<I: IntoIterator<Item = HintEntry>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        for entry in iter {
            dictionary.insert(entry);
        }
        dictionary
    }
}

/// Stop words and hints used by one annotation run
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub stop_words: StopWordSet,
    pub hints: HintDictionary,
}

impl Lexicon {
    pub fn new(stop_words: StopWordSet, hints: HintDictionary) -> Self {
        Self { stop_words, hints }
    }

    /// Load both files. Missing files are treated as empty.
    pub fn load(stop_words_path: &Path, dictionary_path: &Path) -> Result<Self, LexiconError> {
        Ok(Self {
            stop_words: load_stop_words(stop_words_path)?,
            hints: load_hint_dictionary(dictionary_path)?,
        })
    }
}

/// Read a stop-word file, one word per line
pub fn load_stop_words(path: &Path) -> Result<StopWordSet, LexiconError> {
    let Some(content) = read_optional(path)? else {
        debug!("No stop-word file at {:?}", path);
        return Ok(StopWordSet::default());
    };

    Ok(content.lines().collect())
}

// Raw CSV row; extra columns are ignored
#[derive(Debug, Deserialize)]
struct HintRow {
    #[serde(default)]
    word: String,
    #[serde(default)]
    hint_level: Option<String>,
    #[serde(default)]
    short_def: String,
}

/// Read a CSV dictionary whose header names `word`, `hint_level` and `short_def`
pub fn load_hint_dictionary(path: &Path) -> Result<HintDictionary, LexiconError> {
    let Some(content) = read_optional(path)? else {
        debug!("No hint dictionary at {:?}", path);
        return Ok(HintDictionary::default());
    };

    let csv_error = |source| LexiconError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    // Surface an unreadable header as an error instead of skipping every row
    reader.headers().map_err(csv_error)?;

    let mut dictionary = HintDictionary::new();
    for (index, record) in reader.deserialize::<HintRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                // +2: one for the header, one for 1-based numbering
                warn!("Skipping dictionary row {} in {:?}: {}", index + 2, path, e);
                continue;
            }
        };

        if row.word.trim().is_empty() {
            continue;
        }

        dictionary.insert(HintEntry {
            hint_level: parse_hint_level(row.hint_level.as_deref()),
            word: row.word,
            short_def: row.short_def,
        });
    }

    debug!("Loaded {} hint entries from {:?}", dictionary.len(), path);
    Ok(dictionary)
}

/// Absent or blank means the default level; anything unparsable is maximally difficult
pub fn parse_hint_level(raw: Option<&str>) -> i64 {
    match raw.map(str::trim) {
        None | Some("") => DEFAULT_HINT_LEVEL,
        Some(value) => value.parse().unwrap_or(MALFORMED_HINT_LEVEL),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, LexiconError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LexiconError::Read {
            path: PathBuf::from(path),
            source,
        }),
    }
}
