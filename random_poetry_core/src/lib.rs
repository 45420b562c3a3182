// Random Poetry Generator
//
// Builds metered, rhyming poems out of the words of a source text. Every
// word is reduced to a stress pattern through a pronouncing dictionary; the
// text's word adjacency gives the Markov chains that lines are walked along;
// and words are grouped into rhyme classes by the sounds from their last
// stressed vowel onward. A poem form then asks for so many lines per rhyme
// label, each filling a given stress pattern exactly.
//
// Architecture:
// - stress.rs: StressProfile (word + stress pattern), pattern matching with
//   the `2` wildcard, rhyme keys
// - corpus.rs: Text cleaning, word registry, forward/backward adjacency
//   chains, rhyme index, and the directory-backed CorpusRegistry
// - line.rs: Backward backtracking search for one line ending in a seed word
// - block.rs: k rhyming lines drawn from one rhyme class, title-cased
// - form.rs: PoemForm (layout + per-label meter) and the JSON form catalog
// - poem.rs: Poem assembly with bounded retries per rhyme label
// - config.rs: GeneratorConfig (seed, rhyme mode, retry and search caps)
// - error.rs: PoetryError and the crate Result alias
//
// Pronunciations come from `random_poetry_lexicon` and randomness from
// `random_poetry_prng`. Given a seed, generation is fully deterministic.

pub mod block;
pub mod config;
pub mod corpus;
pub mod error;
pub mod form;
pub mod line;
pub mod poem;
pub mod stress;

pub use config::GeneratorConfig;
pub use corpus::{Corpus, CorpusRegistry};
pub use error::{PoetryError, Result};
pub use form::{PoemForm, PoemFormRegistry};
pub use poem::Poem;
pub use stress::{RhymeKey, RhymeMode, StressProfile};
