// Per-word stress profiles and rhyme keys.
//
// A `StressProfile` records how a word scans: one digit per vowel sound of
// its first dictionary pronunciation, `0` unstressed, `1` primary stress,
// `2` secondary stress. Line patterns use the same alphabet, and `2` on
// either side acts as a wildcard when a word is fitted into a line.
//
// Lines are generated from their last word backwards (see `line.rs`), so
// the two operations that matter most are `matches(.., reverse = true)`,
// which fits a word against the tail of the remaining pattern, and
// `remainder`, which cuts that tail off.
//
// `rhyme_key` fingerprints the end of a word: the last stressed vowel
// through the final phoneme. Words with equal keys rhyme. `RhymeMode` can
// relax "stressed" to "any vowel".
//
// Profiles compare, order and hash by their text alone so they can key the
// corpus indices directly.

use random_poetry_lexicon::{Pronouncer, Transcription, stress_digit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Which vowel ends the backwards scan that builds a rhyme key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhymeMode {
    /// The last vowel with primary or secondary stress ("summer" rhymes
    /// on `AH1 M ER0`).
    #[default]
    LastStressedVowel,
    /// The last vowel of any stress ("summer" rhymes on `ER0`).
    LastVowel,
}

impl RhymeMode {
    fn ends_scan(self, digit: u8) -> bool {
        match self {
            RhymeMode::LastStressedVowel => digit == 1 || digit == 2,
            RhymeMode::LastVowel => true,
        }
    }
}

/// Phoneme fingerprint shared by rhyming words.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RhymeKey(Vec<String>);

impl RhymeKey {
    pub fn phonemes(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for RhymeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// How a single word scans, derived from the pronouncing dictionary.
#[derive(Debug, Clone)]
pub struct StressProfile {
    text: String,
    /// `None` when the word is not in the dictionary.
    pattern: Option<String>,
    /// First transcription; empty when the word is not in the dictionary.
    phonemes: Transcription,
}

impl StressProfile {
    /// Look a word up and record the stress digit of every vowel phoneme of
    /// its first pronunciation, in order.
    pub fn derive<P: Pronouncer + ?Sized>(word: &str, lexicon: &P) -> Self {
        let first = lexicon.lookup(word).and_then(|prons| prons.first());
        match first {
            Some(phonemes) => {
                let pattern: String = phonemes
                    .iter()
                    .filter_map(|p| stress_digit(p))
                    .map(|d| char::from(b'0' + d))
                    .collect();
                StressProfile {
                    text: word.to_string(),
                    pattern: Some(pattern),
                    phonemes: phonemes.clone(),
                }
            }
            None => {
                tracing::debug!("stress_pattern: not in lexicon: {word}");
                StressProfile {
                    text: word.to_string(),
                    pattern: None,
                    phonemes: Vec::new(),
                }
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The stress digit string, or `None` for a word missing from the
    /// dictionary.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn is_known(&self) -> bool {
        self.pattern.is_some()
    }

    /// A pattern that can take part in matching. Words with no vowel sound
    /// have an empty pattern and can never fill any part of a line.
    fn usable_pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether this word can fill the start (or, with `reverse`, the end)
    /// of `target`.
    ///
    /// The word's digits are compared with the first (last) digits of the
    /// target, one by one; `2` on either side matches anything. A word
    /// longer than the target never matches.
    pub fn matches(&self, target: &str, reverse: bool) -> bool {
        let Some(pattern) = self.usable_pattern() else {
            return false;
        };
        if pattern.len() > target.len() {
            return false;
        }
        let (word, line) = (pattern.as_bytes(), target.as_bytes());
        if reverse {
            word.iter()
                .rev()
                .zip(line.iter().rev())
                .all(|(&w, &l)| digits_agree(w, l))
        } else {
            word.iter().zip(line).all(|(&w, &l)| digits_agree(w, l))
        }
    }

    /// `target` with this word's share cut off its end, e.g. `"1"` leaves
    /// `"010"` of `"0101"`.
    pub fn remainder<'t>(&self, target: &'t str) -> Option<&'t str> {
        let pattern = self.usable_pattern()?;
        let keep = target.len().checked_sub(pattern.len())?;
        target.get(..keep)
    }

    /// The phonemes from the last rhyme-bearing vowel (per `mode`) through
    /// the end of the word. If no such vowel exists the whole
    /// transcription is the key. `None` for words not in the dictionary.
    pub fn rhyme_key(&self, mode: RhymeMode) -> Option<RhymeKey> {
        if !self.is_known() {
            return None;
        }
        let start = self
            .phonemes
            .iter()
            .rposition(|p| stress_digit(p).is_some_and(|d| mode.ends_scan(d)))
            .unwrap_or(0);
        Some(RhymeKey(self.phonemes[start..].to_vec()))
    }
}

fn digits_agree(word: u8, line: u8) -> bool {
    word == b'2' || line == b'2' || word == line
}

impl PartialEq for StressProfile {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for StressProfile {}

impl PartialOrd for StressProfile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StressProfile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl Hash for StressProfile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for StressProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(p) => write!(f, "{} ({})", self.text, p),
            None => write!(f, "{} (-)", self.text),
        }
    }
}
