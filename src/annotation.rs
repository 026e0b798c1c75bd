/*!
 * WordWise annotation pass.
 *
 * The document is split on the space character into chunks. Each chunk is
 * cleaned into a lookup key and, when the key is a dictionary word that is
 * not a stop word and is easy enough for the chosen threshold, the first
 * whole-word occurrence inside the chunk is wrapped in ruby markup.
 *
 * Chunks are rewritten in place and never added or removed, so the chunk
 * count after the pass equals the count before it.
 */

use crate::lexicon::{HintEntry, Lexicon};
use crate::word_utils::{clean_word, render_annotation, replace_word};

/// Separator the document is split on and rejoined with
pub const CHUNK_SEPARATOR: char = ' ';

/// Progress is reported every this many chunks
pub const PROGRESS_INTERVAL: usize = 100;

/// Share of overall run progress covered by annotation
pub const ANNOTATION_PROGRESS_SPAN: usize = 50;

/// Result of one annotation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationOutcome {
    /// Rewritten document
    pub text: String,
    /// Number of chunks in the document
    pub chunk_count: usize,
    /// Number of chunks that received an annotation
    pub annotated_count: usize,
}

/// Annotates text against a lexicon with a fixed hint threshold
pub struct AnnotationEngine<'a> {
    lexicon: &'a Lexicon,
    hint_threshold: i64,
}

impl<'a> AnnotationEngine<'a> {
    pub fn new(lexicon: &'a Lexicon, hint_threshold: u8) -> Self {
        Self {
            lexicon,
            hint_threshold: i64::from(hint_threshold),
        }
    }

    /// Annotate `text` and return the progress values the pass produced
    pub fn annotate(&self, text: &str) -> (AnnotationOutcome, Vec<u8>) {
        let mut progress = Vec::new();
        let outcome = self.annotate_with(text, |percent| progress.push(percent));
        (outcome, progress)
    }

    /// Annotate `text`, calling `on_progress` every `PROGRESS_INTERVAL` chunks
    pub fn annotate_with<F>(&self, text: &str, mut on_progress: F) -> AnnotationOutcome
    where
        F: FnMut(u8),
    {
        let chunks: Vec<&str> = text.split(CHUNK_SEPARATOR).collect();
        let total = chunks.len();
        let mut annotated_count = 0;

        let mut rewritten = Vec::with_capacity(total);
        for (index, chunk) in chunks.into_iter().enumerate() {
            match self.annotate_chunk(chunk) {
                Some(annotated) => {
                    annotated_count += 1;
                    rewritten.push(annotated);
                }
                None => rewritten.push(chunk.to_string()),
            }

            if index % PROGRESS_INTERVAL == 0 {
                on_progress(annotation_progress(index, total));
            }
        }

        AnnotationOutcome {
            text: rewritten.join(" "),
            chunk_count: total,
            annotated_count,
        }
    }

    /// Rewritten chunk, or `None` when the chunk stays as it is
    pub fn annotate_chunk(&self, chunk: &str) -> Option<String> {
        let cleaned = clean_word(chunk);
        if cleaned.is_empty() {
            return None;
        }

        let entry = self.lookup(&cleaned)?;
        replace_word(chunk, &cleaned, &render_annotation(&cleaned, &entry.short_def))
    }

    // Entry for a cleaned word if it qualifies for annotation
    fn lookup(&self, cleaned: &str) -> Option<&'a HintEntry> {
        let key = cleaned.to_lowercase();
        if self.lexicon.stop_words.contains(&key) {
            return None;
        }

        let entry = self.lexicon.hints.get(&key)?;
        if entry.hint_level > self.hint_threshold {
            return None;
        }

        Some(entry)
    }
}

/// `floor(index / total * 50)`, computed in integers
pub fn annotation_progress(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let value = index.min(total) * ANNOTATION_PROGRESS_SPAN / total;
    value as u8
}
