// Corpus indexing: word registry, adjacency chains and rhyme classes.
//
// A `Corpus` is built once from raw text and is read-only afterwards, so
// one corpus can back any number of generation calls (it is `Send + Sync`).
// Building it:
// 1. Cleaning: split on whitespace, strip ASCII punctuation, drop tokens
//    left empty, lowercase.
// 2. Registry: one `StressProfile` per distinct cleaned word the lexicon
//    knows. Unknown words stay in `cleaned_words` but are indexed nowhere.
// 3. Chains: for every adjacent token pair where both tokens are in the
//    registry, record a forward edge (word -> next word) and a backward
//    edge (word -> previous word). Repeats are kept, so a pair seen twice
//    is twice as likely when the chain is sampled as a list.
// 4. Rhyme index: registry entries grouped by `rhyme_key()`.
//
// Every profile in the chains and the rhyme index is the same `Arc` the
// registry holds. All maps are ordered so seeded runs are reproducible.
//
// `CorpusRegistry` loads every `*.txt` file of a directory, keyed by file
// stem.

use crate::error::{PoetryError, Result};
use crate::stress::{RhymeKey, RhymeMode, StressProfile};
use random_poetry_lexicon::Pronouncer;
use random_poetry_prng::PoetryRng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Adjacency map from a word to the words seen next to it, repeats kept.
pub type Chain = BTreeMap<Arc<StressProfile>, Vec<Arc<StressProfile>>>;

/// A set of words sharing a rhyme key.
pub type RhymeClass = BTreeSet<Arc<StressProfile>>;

#[derive(Debug, Clone)]
pub struct Corpus {
    name: String,
    cleaned_words: Vec<String>,
    registry: BTreeMap<String, Arc<StressProfile>>,
    forward_chain: Chain,
    backward_chain: Chain,
    rhyme_index: BTreeMap<RhymeKey, RhymeClass>,
}

/// Lowercase the tokens and strip ASCII punctuation, dropping tokens that
/// end up empty.
pub fn clean_text<I, S>(raw_words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_words
        .into_iter()
        .filter_map(|w| {
            let stripped: String = w
                .as_ref()
                .chars()
                .filter(|c| !c.is_ascii_punctuation())
                .collect();
            (!stripped.is_empty()).then(|| stripped.to_lowercase())
        })
        .collect()
}

impl Corpus {
    /// Index a sequence of raw tokens.
    pub fn build<I, S, P>(raw_words: I, name: &str, lexicon: &P, rhyme_mode: RhymeMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: Pronouncer + ?Sized,
    {
        debug!("Corpus: initializing corpus: {name}");
        let cleaned_words = clean_text(raw_words);
        debug!("Corpus: cleaned text has {} words", cleaned_words.len());

        let registry = build_registry(&cleaned_words, lexicon);
        let (forward_chain, backward_chain) = build_chains(&cleaned_words, &registry);
        let rhyme_index = build_rhyme_index(&registry, rhyme_mode);

        debug!(
            "Corpus: {name}: {} registered words, chains forward {} / backward {}, {} rhymes",
            registry.len(),
            forward_chain.len(),
            backward_chain.len(),
            rhyme_index.len()
        );

        Corpus {
            name: name.to_string(),
            cleaned_words,
            registry,
            forward_chain,
            backward_chain,
            rhyme_index,
        }
    }

    /// Index a block of text, splitting it on whitespace.
    pub fn from_text<P>(text: &str, name: &str, lexicon: &P, rhyme_mode: RhymeMode) -> Self
    where
        P: Pronouncer + ?Sized,
    {
        Self::build(text.split_whitespace(), name, lexicon, rhyme_mode)
    }

    /// Load and index a text file. The corpus is named after the file stem.
    pub fn from_path<P>(path: &Path, lexicon: &P, rhyme_mode: RhymeMode) -> Result<Self>
    where
        P: Pronouncer + ?Sized,
    {
        debug!("Corpus: loading file {}", path.display());
        if !path.exists() {
            return Err(PoetryError::not_found("corpus", path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(&text, &name, lexicon, rhyme_mode))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cleaned_words(&self) -> &[String] {
        &self.cleaned_words
    }

    /// The registered profile for a word, if the lexicon knew it.
    pub fn profile(&self, word: &str) -> Option<&Arc<StressProfile>> {
        self.registry.get(word)
    }

    pub fn registry(&self) -> impl Iterator<Item = &Arc<StressProfile>> {
        self.registry.values()
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Words seen directly after `word`, with repeats.
    pub fn followers(&self, word: &StressProfile) -> &[Arc<StressProfile>] {
        self.forward_chain.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Words seen directly before `word`, with repeats.
    pub fn predecessors(&self, word: &StressProfile) -> &[Arc<StressProfile>] {
        self.backward_chain.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn forward_chain(&self) -> &Chain {
        &self.forward_chain
    }

    pub fn backward_chain(&self) -> &Chain {
        &self.backward_chain
    }

    pub fn rhyme_class(&self, key: &RhymeKey) -> Option<&RhymeClass> {
        self.rhyme_index.get(key)
    }

    pub fn rhyme_classes(&self) -> impl Iterator<Item = (&RhymeKey, &RhymeClass)> {
        self.rhyme_index.iter()
    }
}

fn build_registry<P>(words: &[String], lexicon: &P) -> BTreeMap<String, Arc<StressProfile>>
where
    P: Pronouncer + ?Sized,
{
    let mut registry = BTreeMap::new();
    let mut unknown = BTreeSet::new();
    for word in words {
        if registry.contains_key(word) || unknown.contains(word.as_str()) {
            continue;
        }
        let profile = StressProfile::derive(word, lexicon);
        if profile.is_known() {
            registry.insert(word.clone(), Arc::new(profile));
        } else {
            unknown.insert(word.as_str());
        }
    }
    debug!(
        "Corpus: added {} words to the registry, skipped {} unknown",
        registry.len(),
        unknown.len()
    );
    registry
}

fn build_chains(words: &[String], registry: &BTreeMap<String, Arc<StressProfile>>) -> (Chain, Chain) {
    let mut forward = Chain::new();
    let mut backward = Chain::new();
    for pair in words.windows(2) {
        let (Some(prev), Some(next)) = (registry.get(&pair[0]), registry.get(&pair[1])) else {
            continue;
        };
        forward.entry(Arc::clone(prev)).or_default().push(Arc::clone(next));
        backward.entry(Arc::clone(next)).or_default().push(Arc::clone(prev));
    }
    (forward, backward)
}

fn build_rhyme_index(
    registry: &BTreeMap<String, Arc<StressProfile>>,
    mode: RhymeMode,
) -> BTreeMap<RhymeKey, RhymeClass> {
    let mut index: BTreeMap<RhymeKey, RhymeClass> = BTreeMap::new();
    for profile in registry.values() {
        if let Some(key) = profile.rhyme_key(mode) {
            index.entry(key).or_default().insert(Arc::clone(profile));
        }
    }
    index
}

/// Every corpus found in a directory of `*.txt` files, by name.
#[derive(Debug, Clone, Default)]
pub struct CorpusRegistry {
    corpora: BTreeMap<String, Corpus>,
}

impl CorpusRegistry {
    /// Load every `*.txt` file in `dir`.
    pub fn from_dir<P>(dir: &Path, lexicon: &P, rhyme_mode: RhymeMode) -> Result<Self>
    where
        P: Pronouncer + ?Sized,
    {
        if !dir.is_dir() {
            return Err(PoetryError::not_found(
                "corpus directory",
                dir.display().to_string(),
            ));
        }
        let mut registry = CorpusRegistry::default();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                registry.insert(Corpus::from_path(&path, lexicon, rhyme_mode)?);
            }
        }
        info!(
            "CorpusRegistry: loaded {} corpora from {}",
            registry.len(),
            dir.display()
        );
        Ok(registry)
    }

    /// Add a corpus, replacing any with the same name.
    pub fn insert(&mut self, corpus: Corpus) {
        self.corpora.insert(corpus.name().to_string(), corpus);
    }

    pub fn get(&self, name: &str) -> Result<&Corpus> {
        self.corpora
            .get(name)
            .ok_or_else(|| PoetryError::not_found("corpus", name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.corpora.keys().map(String::as_str)
    }

    /// A uniformly random corpus, or `None` if the registry is empty.
    pub fn choose(&self, rng: &mut PoetryRng) -> Option<&Corpus> {
        let all: Vec<&Corpus> = self.corpora.values().collect();
        rng.choose(&all).copied()
    }

    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }
}
