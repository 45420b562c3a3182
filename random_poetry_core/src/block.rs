// Rhyming blocks: k lines on one meter that all end in the same rhyme.
//
// A block attempt:
// 1. Draw a random rhyme class among those with at least k members, and
//    keep the members whose pattern fits the end of the line pattern. Draw
//    again until some class yields at least k such seed words (at most
//    `max_class_draws` draws).
// 2. Walk those seeds in random order, running a line search ending in
//    each, until k lines have been found.
// Running out of seeds or draws fails the attempt with `None`; the poem
// assembler retries with a fresh attempt.
//
// Lines are joined with single spaces and title-cased.

use crate::config::GeneratorConfig;
use crate::corpus::{Corpus, RhymeClass};
use crate::line::generate_line;
use crate::stress::{RhymeKey, StressProfile};
use random_poetry_prng::PoetryRng;
use std::sync::Arc;
use tracing::debug;

/// The lines of one rhyme label, in the order they were generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemBlock {
    /// The rhyme class every line's final word was drawn from.
    pub rhyme: RhymeKey,
    pub lines: Vec<String>,
}

/// Uppercase the first letter of every run of letters and lowercase the
/// rest ("o'er the hill" -> "O'Er The Hill").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Generate `k` rhyming lines that each fill `line_pattern` exactly.
pub fn generate_block(
    corpus: &Corpus,
    line_pattern: &str,
    k: usize,
    rng: &mut PoetryRng,
    config: &GeneratorConfig,
) -> Option<PoemBlock> {
    debug!("Poem: generating poem block: {line_pattern}, k={k}");
    if k == 0 {
        return None;
    }

    let (rhyme, mut seeds) = pick_seed_words(corpus, line_pattern, k, rng, config)?;
    rng.shuffle(&mut seeds);

    let mut lines = Vec::with_capacity(k);
    for seed in seeds {
        debug!("Poem: trying to generate a line from seed word: {seed}");
        let Some(words) = generate_line(corpus, seed, line_pattern, rng, config.line_search_budget)
        else {
            continue;
        };
        let line = words
            .iter()
            .map(|w| w.text())
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Poem: found a line: {line}");
        lines.push(title_case(&line));
        if lines.len() == k {
            return Some(PoemBlock { rhyme, lines });
        }
    }

    debug!(
        "Poem: block attempt found only {} of {k} lines",
        lines.len()
    );
    None
}

/// Draw rhyme classes until one has at least `k` members that fit the end
/// of `line_pattern`.
fn pick_seed_words<'c>(
    corpus: &'c Corpus,
    line_pattern: &str,
    k: usize,
    rng: &mut PoetryRng,
    config: &GeneratorConfig,
) -> Option<(RhymeKey, Vec<&'c Arc<StressProfile>>)> {
    let eligible: Vec<(&RhymeKey, &RhymeClass)> = corpus
        .rhyme_classes()
        .filter(|(_, class)| class.len() >= k)
        .collect();
    if eligible.is_empty() {
        debug!("Poem: no rhyme class has {k} members");
        return None;
    }

    for _ in 0..config.max_class_draws {
        let &(key, class) = rng.choose(&eligible)?;
        debug!("Poem: picked seed rhyme {key}");
        let seeds: Vec<&Arc<StressProfile>> = class
            .iter()
            .filter(|w| w.matches(line_pattern, true))
            .collect();
        debug!("Poem: found {} seed words", seeds.len());
        if seeds.len() >= k {
            return Some((key.clone(), seeds));
        }
    }

    debug!(
        "Poem: no rhyme class with {k} seeds for {line_pattern} in {} draws",
        config.max_class_draws
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::RhymeMode;
    use random_poetry_lexicon::Lexicon;

    fn cats() -> Corpus {
        let lexicon = Lexicon::from_cmudict(
            "the DH AH0\ncat K AE1 T\nsat S AE1 T\nmat M AE1 T\na AH0\nhat HH AE1 T\n",
        );
        Corpus::from_text(
            "the cat the mat a hat the sat",
            "cats",
            &lexicon,
            RhymeMode::default(),
        )
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            max_class_draws: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the little dog"), "The Little Dog");
        assert_eq!(title_case("THE cAT"), "The Cat");
        assert_eq!(title_case("o'er 1st"), "O'Er 1St");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_single_line_all_unstressed() {
        let lexicon = Lexicon::from_cmudict(
            "the DH AH0\ncat K AE0 T\nsat S AE0 T\non AA0 N\nmat M AE0 T\n",
        );
        let corpus = Corpus::from_text(
            "the cat sat on the mat",
            "cats",
            &lexicon,
            RhymeMode::default(),
        );
        let mut rng = PoetryRng::new(5);
        let block = generate_block(&corpus, "0", 1, &mut rng, &config()).unwrap();
        assert_eq!(block.lines.len(), 1);
        let word = block.lines[0].to_lowercase();
        assert_eq!(corpus.profile(&word).unwrap().pattern(), Some("0"));
    }

    #[test]
    fn test_block_lines_rhyme() {
        let corpus = cats();
        for seed in 0..10 {
            let mut rng = PoetryRng::new(seed);
            let block = generate_block(&corpus, "01", 2, &mut rng, &config()).unwrap();
            assert_eq!(block.lines.len(), 2);
            assert_ne!(block.lines[0], block.lines[1]);
            for line in &block.lines {
                let words: Vec<String> = line.split(' ').map(str::to_lowercase).collect();
                assert_eq!(words.len(), 2, "{line}");
                let last = corpus.profile(&words[1]).unwrap();
                assert_eq!(
                    last.rhyme_key(RhymeMode::LastStressedVowel).as_ref(),
                    Some(&block.rhyme)
                );
            }
        }
    }

    #[test]
    fn test_no_class_large_enough() {
        let corpus = cats();
        let mut rng = PoetryRng::new(1);
        assert!(generate_block(&corpus, "01", 5, &mut rng, &config()).is_none());
    }

    #[test]
    fn test_unfillable_pattern_fails() {
        let corpus = cats();
        let mut rng = PoetryRng::new(1);
        assert!(generate_block(&corpus, "001", 2, &mut rng, &config()).is_none());
    }

    #[test]
    fn test_zero_lines_is_none() {
        let corpus = cats();
        let mut rng = PoetryRng::new(1);
        assert!(generate_block(&corpus, "01", 0, &mut rng, &config()).is_none());
    }

    #[test]
    fn test_same_seed_same_block() {
        let corpus = cats();
        let a = generate_block(&corpus, "01", 2, &mut PoetryRng::new(77), &config());
        let b = generate_block(&corpus, "01", 2, &mut PoetryRng::new(77), &config());
        assert_eq!(a, b);
    }
}
