// Data-driven generator configuration.
//
// Tunables for the search live in `GeneratorConfig`, optionally loaded from
// JSON (`data/config/generator.json`). Every field has a default, so a
// partial file or no file at all is fine.
//
// The retry and budget caps exist because a corpus may simply not contain
// the words a pattern needs. Without them poem assembly could loop forever.
//
// `seed` makes a run reproducible: the same seed, corpus, lexicon and form
// always produce the same poem.

use crate::error::{PoetryError, Result};
use crate::stress::RhymeMode;
use random_poetry_prng::PoetryRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fixed PRNG seed. `None` seeds from the system clock.
    pub seed: Option<u64>,
    /// How rhyme keys are extracted when a corpus is indexed.
    pub rhyme_mode: RhymeMode,
    /// Block attempts per rhyme label before the poem is given up.
    pub max_block_attempts: u32,
    /// Rhyme classes drawn per block attempt while looking for one with
    /// enough seed words.
    pub max_class_draws: u32,
    /// Search nodes a single line attempt may visit before it counts as a
    /// miss.
    pub line_search_budget: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: None,
            rhyme_mode: RhymeMode::LastStressedVowel,
            max_block_attempts: 200,
            max_class_draws: 1000,
            line_search_budget: 50_000,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PoetryError::not_found(
                "generator config",
                path.display().to_string(),
            ));
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Build the PRNG for one generation run, logging the seed actually
    /// used.
    pub fn rng(&self) -> PoetryRng {
        match self.seed {
            Some(seed) => PoetryRng::new(seed),
            None => {
                let (rng, seed) = PoetryRng::from_clock();
                tracing::debug!("GeneratorConfig: seeded from clock: {seed}");
                rng
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            GeneratorConfig::from_json(r#"{"seed": 7, "rhyme_mode": "last_vowel"}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rhyme_mode, RhymeMode::LastVowel);
        assert_eq!(config.max_block_attempts, 200);
    }

    #[test]
    fn test_bad_json_is_error() {
        let err = GeneratorConfig::from_json(r#"{"rhyme_mode": "assonance"}"#).unwrap_err();
        assert!(matches!(err, PoetryError::Json(_)));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = GeneratorConfig {
            seed: Some(42),
            ..Default::default()
        };
        assert_eq!(config.rng().next_u64(), config.rng().next_u64());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PoetryError::NotFound { .. }));
    }

    #[test]
    fn test_shipped_config_parses() {
        let json = include_str!("../../data/config/generator.json");
        let config = GeneratorConfig::from_json(json).unwrap();
        assert_eq!(config.rhyme_mode, RhymeMode::LastStressedVowel);
    }
}
