// Poem assembly: one rhyming block per label, laid out by the form.
//
// Each distinct label in the form's layout gets one block with as many
// lines as the label appears. Labels are generated in order of first
// appearance so a seeded run always draws from the PRNG in the same order.
// A block attempt that fails is retried up to `max_block_attempts` times,
// then the whole poem fails with `GenerationFailed`.
//
// The layout is then walked in order: a space emits an empty line and a
// label emits the next unused line from its block.

use crate::block::{PoemBlock, generate_block};
use crate::config::GeneratorConfig;
use crate::corpus::Corpus;
use crate::error::{PoetryError, Result};
use crate::form::PoemForm;
use random_poetry_prng::PoetryRng;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

/// One corpus bound to one form. Holds no state between calls; every
/// `generate` produces a fresh poem.
#[derive(Debug, Clone, Copy)]
pub struct Poem<'a> {
    corpus: &'a Corpus,
    form: &'a PoemForm,
}

impl<'a> Poem<'a> {
    pub fn new(corpus: &'a Corpus, form: &'a PoemForm) -> Self {
        Poem { corpus, form }
    }

    /// Generate the poem text. Lines are separated by `\n` and the result is
    /// trimmed of surrounding whitespace.
    pub fn generate(&self, rng: &mut PoetryRng, config: &GeneratorConfig) -> Result<String> {
        info!(
            "Poem: generating '{}' from corpus '{}'",
            self.form.name,
            self.corpus.name()
        );
        self.form.validate()?;

        let mut blocks: BTreeMap<char, VecDeque<String>> = BTreeMap::new();
        for (label, count) in self.form.label_counts() {
            let pattern = self.form.pattern_for(label).ok_or_else(|| {
                PoetryError::InvalidForm {
                    form: self.form.name.clone(),
                    reason: format!("no pattern for rhyme label '{label}'"),
                }
            })?;
            let block = self.generate_label(label, pattern, count, rng, config)?;
            blocks.insert(label, block.lines.into());
        }

        let mut out: Vec<String> = Vec::new();
        for c in self.form.lines.chars() {
            if c == ' ' {
                out.push(String::new());
                continue;
            }
            let line = blocks.get_mut(&c).and_then(VecDeque::pop_front);
            // Each block has exactly one line per occurrence of its label.
            out.extend(line);
        }
        Ok(out.join("\n").trim().to_string())
    }

    fn generate_label(
        &self,
        label: char,
        pattern: &str,
        count: usize,
        rng: &mut PoetryRng,
        config: &GeneratorConfig,
    ) -> Result<PoemBlock> {
        for attempt in 1..=config.max_block_attempts {
            if let Some(block) = generate_block(self.corpus, pattern, count, rng, config) {
                debug!(
                    "Poem: label {label} done after {attempt} attempts, rhyme {}",
                    block.rhyme
                );
                return Ok(block);
            }
        }
        warn!(
            "Poem: giving up on label {label} ({pattern} x{count}) after {} attempts",
            config.max_block_attempts
        );
        Err(PoetryError::GenerationFailed {
            form: self.form.name.clone(),
            corpus: self.corpus.name().to_string(),
        })
    }
}
