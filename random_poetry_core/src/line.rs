// Backtracking search for one metrically exact line.
//
// A line is grown from its last word towards its first, so the caller picks
// the rhyme word and the search fills in the meter before it. At each step:
// 1. If the current word's pattern is the whole remaining pattern, the line
//    is complete.
// 2. If the word cannot fill the tail of the remaining pattern, this branch
//    is dead.
// 3. Otherwise cut the word's share off the pattern, collect the distinct
//    words the corpus has seen directly before it that fit the new tail,
//    and try them in random order, recursing on each.
// The first success wins; the current word is appended after the words
// returned from below, which keeps left-to-right order.
//
// Every step removes at least one digit from the pattern (words with empty
// patterns never match), so recursion depth is at most the pattern length.
// Fan-out can still be large on big corpora, so each search carries a
// budget of visited nodes; running out is an ordinary miss.
//
// A miss is `None`. It is expected and frequent: the block generator simply
// tries the next seed word.

use crate::corpus::Corpus;
use crate::stress::StressProfile;
use random_poetry_prng::PoetryRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// One line search over a corpus, with its node budget.
pub struct LineSearch<'c> {
    corpus: &'c Corpus,
    budget: usize,
    visited: usize,
}

impl<'c> LineSearch<'c> {
    pub fn new(corpus: &'c Corpus, budget: usize) -> Self {
        LineSearch {
            corpus,
            budget,
            visited: 0,
        }
    }

    /// Search nodes visited so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Find a word sequence ending in `seed` whose stress patterns fill
    /// `line_pattern` exactly, or `None` if there is none within budget.
    pub fn run(
        &mut self,
        seed: &Arc<StressProfile>,
        line_pattern: &str,
        rng: &mut PoetryRng,
    ) -> Option<Vec<Arc<StressProfile>>> {
        debug!("poetry_line({seed}, {line_pattern})");

        self.visited += 1;
        if self.visited > self.budget {
            debug!("poetry_line({seed}): search budget of {} spent", self.budget);
            return None;
        }

        if !line_pattern.is_empty() && seed.pattern() == Some(line_pattern) {
            debug!("poetry_line({seed}): found final match");
            return Some(vec![Arc::clone(seed)]);
        }
        if !seed.matches(line_pattern, true) {
            debug!("poetry_line({seed}): no match");
            return None;
        }

        let rest = seed.remainder(line_pattern)?;
        let corpus = self.corpus;
        let distinct: BTreeSet<&Arc<StressProfile>> = corpus
            .predecessors(seed)
            .iter()
            .filter(|w| w.matches(rest, true))
            .collect();
        debug!(
            "poetry_line({seed}): trying to match {} options to {rest}",
            distinct.len()
        );
        if distinct.is_empty() {
            return None;
        }

        let mut options: Vec<&Arc<StressProfile>> = distinct.into_iter().collect();
        rng.shuffle(&mut options);
        for next in options {
            if let Some(mut line) = self.run(next, rest, rng) {
                debug!("poetry_line({seed}): found a match");
                line.push(Arc::clone(seed));
                return Some(line);
            }
        }

        debug!("poetry_line({seed}): found no valid options");
        None
    }
}

/// Generate one line ending in `seed`. See `LineSearch::run`.
pub fn generate_line(
    corpus: &Corpus,
    seed: &Arc<StressProfile>,
    line_pattern: &str,
    rng: &mut PoetryRng,
    budget: usize,
) -> Option<Vec<Arc<StressProfile>>> {
    LineSearch::new(corpus, budget).run(seed, line_pattern, rng)
}
