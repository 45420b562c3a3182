// Poem forms: line layout plus per-label meter, loaded from JSON.
//
// A form's `lines` string has one character per output line. A letter is a
// rhyme label (every line with the same label rhymes) and a space is a
// blank line, so a Shakespearean sonnet is `"ABAB CDCD EFEF GG"`.
// `pattern` maps each label to the stress pattern its lines must fill.
//
// The catalog file looks like:
//   {"poemforms": [{"name": "Couplet", "lines": "AA",
//                   "pattern": {"A": "0101010101"}}]}
// Forms are validated on load and kept in file order.

use crate::error::{PoetryError, Result};
use random_poetry_prng::PoetryRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemForm {
    pub name: String,
    /// Rhyme labels, one per line; a space is a blank line.
    pub lines: String,
    /// Stress pattern for each rhyme label.
    pub pattern: BTreeMap<String, String>,
}

impl PoemForm {
    pub fn new(name: &str, lines: &str, pattern: &[(char, &str)]) -> Self {
        PoemForm {
            name: name.to_string(),
            lines: lines.to_string(),
            pattern: pattern
                .iter()
                .map(|(label, p)| (label.to_string(), p.to_string()))
                .collect(),
        }
    }

    /// The stress pattern for a rhyme label.
    pub fn pattern_for(&self, label: char) -> Option<&str> {
        let mut buf = [0u8; 4];
        self.pattern
            .get(label.encode_utf8(&mut buf) as &str)
            .map(String::as_str)
    }

    /// Number of lines each rhyme label needs, in order of first
    /// appearance in the layout.
    pub fn label_counts(&self) -> Vec<(char, usize)> {
        let mut counts: Vec<(char, usize)> = Vec::new();
        for label in self.lines.chars().filter(|&c| c != ' ') {
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label, 1)),
            }
        }
        counts
    }

    /// Check that every label in the layout has a pattern, every key is a
    /// single character, and every pattern is a non-empty string of 0/1/2.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| PoetryError::InvalidForm {
            form: self.name.clone(),
            reason,
        };

        if self.lines.trim().is_empty() {
            return Err(invalid("layout has no lines".into()));
        }
        for (key, pattern) in &self.pattern {
            if key.chars().count() != 1 {
                return Err(invalid(format!(
                    "pattern key '{key}' is not a single character"
                )));
            }
            if pattern.is_empty() {
                return Err(invalid(format!("pattern for '{key}' is empty")));
            }
            if let Some(bad) = pattern.chars().find(|&c| !matches!(c, '0' | '1' | '2')) {
                return Err(invalid(format!(
                    "pattern for '{key}' contains '{bad}' (allowed: 0, 1, 2)"
                )));
            }
        }
        for (label, _) in self.label_counts() {
            if self.pattern_for(label).is_none() {
                return Err(invalid(format!("no pattern for rhyme label '{label}'")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PoemFormFile {
    poemforms: Vec<PoemForm>,
}

/// The catalog of available poem forms.
#[derive(Debug, Clone, Default)]
pub struct PoemFormRegistry {
    forms: Vec<PoemForm>,
}

impl PoemFormRegistry {
    /// Parse and validate a catalog.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PoemFormFile = serde_json::from_str(json)?;
        for form in &file.poemforms {
            form.validate()?;
            debug!("PoemFormRegistry: loaded form {}", form.name);
        }
        Ok(PoemFormRegistry {
            forms: file.poemforms,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("PoemFormRegistry: loading file {}", path.display());
        if !path.exists() {
            return Err(PoetryError::not_found(
                "poem form catalog",
                path.display().to_string(),
            ));
        }
        let registry = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "PoemFormRegistry: loaded {} forms from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Result<&PoemForm> {
        self.forms
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| PoetryError::not_found("poem form", name))
    }

    /// Form names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().map(|f| f.name.as_str())
    }

    /// A uniformly random form, or `None` if the catalog is empty.
    pub fn choose(&self, rng: &mut PoetryRng) -> Option<&PoemForm> {
        rng.choose(&self.forms)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
