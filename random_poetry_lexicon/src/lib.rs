// Pronouncing-dictionary adapter for the random poetry generator.
//
// The generator needs exactly one thing from the outside world about a word:
// how it is pronounced. This crate answers that question and nothing else.
//
// Architecture:
// - `phonemes.rs`: `Transcription` type and ARPABET stress-digit helpers
// - `lib.rs` (this file): the `Pronouncer` trait the core crate is generic
//   over, and `Lexicon`, a parser for the CMU Pronouncing Dictionary text
//   format
//
// The lexicon is built once at startup and then shared read-only with every
// corpus that needs it (pass `&Lexicon` or wrap it in an `Arc`). There is
// no process-wide cache. `default_lexicon()` embeds
// `data/cmudict_sample.dict` with `include_str!`; a full `cmudict.dict` can
// be loaded at runtime with `Lexicon::from_path()`.
//
// Entries are kept in a `BTreeMap` so iteration order never depends on
// hashing, which keeps seeded generation reproducible.

pub mod phonemes;

pub use phonemes::{Transcription, is_vowel, stress_digit, vowel_count};

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a dictionary.
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("pronouncing dictionary not found: {0}")]
    NotFound(String),

    #[error("failed to read pronouncing dictionary: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of pronunciations.
///
/// `lookup` returns every transcription known for a word, most common
/// first, or `None` if the word is unknown. Callers only ever use the first
/// transcription.
pub trait Pronouncer {
    fn lookup(&self, word: &str) -> Option<&[Transcription]>;
}

impl<P: Pronouncer + ?Sized> Pronouncer for &P {
    fn lookup(&self, word: &str) -> Option<&[Transcription]> {
        (**self).lookup(word)
    }
}

impl<P: Pronouncer + ?Sized> Pronouncer for std::sync::Arc<P> {
    fn lookup(&self, word: &str) -> Option<&[Transcription]> {
        (**self).lookup(word)
    }
}

/// A parsed pronouncing dictionary, keyed by lowercase word.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: BTreeMap<String, Vec<Transcription>>,
}

impl Lexicon {
    /// Parse the CMU Pronouncing Dictionary text format.
    ///
    /// One entry per line: the word, then its phonemes, separated by
    /// whitespace. Alternate pronunciations are written `WORD(2) ...` and
    /// are appended after the primary one in file order. `;;;` lines are
    /// comments, as is anything after ` #` on a line.
    pub fn from_cmudict(text: &str) -> Self {
        let mut entries: BTreeMap<String, Vec<Transcription>> = BTreeMap::new();
        let mut skipped = 0usize;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let line = match line.find(" #") {
                Some(idx) => &line[..idx],
                None => line,
            };

            let mut parts = line.split_whitespace();
            let Some(raw_word) = parts.next() else {
                continue;
            };
            let phonemes: Transcription = parts.map(str::to_string).collect();
            if phonemes.is_empty() {
                skipped += 1;
                continue;
            }

            // Strip the variant marker: "word(2)" -> "word".
            let word = raw_word.split('(').next().unwrap_or(raw_word).to_lowercase();
            entries.entry(word).or_default().push(phonemes);
        }

        debug!(
            words = entries.len(),
            skipped, "Lexicon: parsed pronouncing dictionary"
        );
        Lexicon { entries }
    }

    /// Read and parse a CMU-format dictionary file.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        if !path.exists() {
            return Err(LexiconError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_cmudict(&text))
    }

    /// Add a pronunciation for a word, after any it already has.
    pub fn insert(&mut self, word: &str, transcription: Transcription) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(transcription);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Pronouncer for Lexicon {
    fn lookup(&self, word: &str) -> Option<&[Transcription]> {
        if word.chars().any(char::is_uppercase) {
            self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
        } else {
            self.entries.get(word).map(Vec::as_slice)
        }
    }
}

/// Load the sample dictionary embedded at compile time.
///
/// Covers the words in the bundled corpora. Use `Lexicon::from_path` with a
/// full `cmudict.dict` for arbitrary text.
pub fn default_lexicon() -> Lexicon {
    Lexicon::from_cmudict(include_str!("../../data/cmudict_sample.dict"))
}
