// End-to-end generation tests.
//
// Builds corpora from inline text and from the bundled data directory, runs
// full poem generation, and checks the output against the form: line count,
// blank lines, per-line meter, and shared rhyme within each label. The last
// few tests drive the `poem` binary itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use random_poetry_core::{
    Corpus, CorpusRegistry, GeneratorConfig, Poem, PoemForm, PoemFormRegistry, PoetryError,
    RhymeKey, RhymeMode,
};
use random_poetry_lexicon::{Lexicon, default_lexicon};
use random_poetry_prng::PoetryRng;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../data")
}

fn seeded(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

/// Look a generated (title-cased) word back up in the corpus.
fn word_pattern(corpus: &Corpus, word: &str) -> String {
    let profile = corpus
        .profile(&word.to_lowercase())
        .unwrap_or_else(|| panic!("{word} not in corpus"));
    profile.pattern().unwrap().to_string()
}

fn final_rhyme(corpus: &Corpus, line: &str) -> RhymeKey {
    let last = line.split(' ').next_back().unwrap().to_lowercase();
    corpus
        .profile(&last)
        .unwrap()
        .rhyme_key(RhymeMode::LastStressedVowel)
        .unwrap()
}

/// Walk a line back from its last word: each word must fit the tail of what
/// is left of `pattern` (`2` matching anything) and the first word must use
/// up the rest.
fn assert_fills(corpus: &Corpus, line: &str, pattern: &str) {
    let mut rest = pattern;
    for word in line.split(' ').rev() {
        let profile = corpus
            .profile(&word.to_lowercase())
            .unwrap_or_else(|| panic!("{word} not in corpus"));
        assert!(
            profile.matches(rest, true),
            "line {line:?}: {profile} does not fit the end of {rest}"
        );
        rest = profile.remainder(rest).unwrap();
    }
    assert!(rest.is_empty(), "line {line:?} leaves {rest} of {pattern} unfilled");
}

/// Check a generated poem against its form: blank lines where the layout
/// has spaces, each line filling its label's pattern, and all lines of a
/// label ending in the same rhyme.
fn check_poem(corpus: &Corpus, form: &PoemForm, text: &str) {
    let layout: Vec<char> = form.lines.trim().chars().collect();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), layout.len(), "{text}");

    let mut rhymes: BTreeMap<char, RhymeKey> = BTreeMap::new();
    for (label, line) in layout.iter().zip(&lines) {
        if *label == ' ' {
            assert!(line.is_empty(), "expected blank line, got {line:?}");
            continue;
        }
        assert_fills(corpus, line, form.pattern_for(*label).unwrap());
        let rhyme = final_rhyme(corpus, line);
        match rhymes.get(label) {
            Some(expected) => assert_eq!(&rhyme, expected, "label {label} lines do not rhyme"),
            None => {
                rhymes.insert(*label, rhyme);
            }
        }
    }
}

#[test]
fn single_unstressed_word_line() {
    let lexicon = Lexicon::from_cmudict(
        "the DH AH0\ncat K AE0 T\nsat S AE0 T\non AA0 N\nmat M AE0 T\n",
    );
    let corpus = Corpus::from_text(
        "the cat sat on the mat",
        "cats",
        &lexicon,
        RhymeMode::default(),
    );
    let form = PoemForm::new("One", "A", &[('A', "0")]);
    let text = Poem::new(&corpus, &form)
        .generate(&mut PoetryRng::new(1), &seeded(1))
        .unwrap();
    assert_eq!(text.split(' ').count(), 1, "{text}");
    assert_eq!(word_pattern(&corpus, &text), "0");
}

#[test]
fn rhyming_couplet_from_small_corpus() {
    let lexicon = Lexicon::from_cmudict(
        "the DH AH0\ncat K AE1 T\nsat S AE1 T\nmat M AE1 T\na AH0\nhat HH AE1 T\non AA1 N\n",
    );
    let corpus = Corpus::from_text(
        "The cat sat on the mat. A hat!",
        "cats",
        &lexicon,
        RhymeMode::default(),
    );
    let form = PoemForm::new("AA", "AA", &[('A', "01")]);
    for seed in 0..10 {
        let text = Poem::new(&corpus, &form)
            .generate(&mut PoetryRng::new(seed), &seeded(seed))
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| !l.is_empty()));
        check_poem(&corpus, &form, &text);
    }
}

#[test]
fn wildcard_syllables_accept_either_stress() {
    let lexicon = Lexicon::from_cmudict(
        "the DH AH0\ncat K AE1 T\nsat S AE1 T\nmat M AE1 T\na AH0\nhat HH AE1 T\n",
    );
    let corpus = Corpus::from_text(
        "the cat the mat a hat the sat",
        "cats",
        &lexicon,
        RhymeMode::default(),
    );
    // The third syllable is a wildcard, so "the cat the mat" (0101) fits.
    let form = PoemForm::new("Loose", "AA", &[('A', "0121")]);
    for seed in 0..10 {
        let text = Poem::new(&corpus, &form)
            .generate(&mut PoetryRng::new(seed), &seeded(seed))
            .unwrap();
        for line in text.lines() {
            let exact: String = line.split(' ').map(|w| word_pattern(&corpus, w)).collect();
            assert_ne!(exact, "0121", "no word here carries a secondary stress");
        }
        check_poem(&corpus, &form, &text);
    }
}

#[test]
fn missing_corpus_is_not_found() {
    let lexicon = default_lexicon();
    let err = Corpus::from_path(
        &data_dir().join("textinput").join("no_such_corpus.txt"),
        &lexicon,
        RhymeMode::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PoetryError::NotFound { kind: "corpus", .. }));

    let registry = CorpusRegistry::default();
    assert!(matches!(
        registry.get("no_such_corpus"),
        Err(PoetryError::NotFound { .. })
    ));
}

#[test]
fn hopeless_form_gives_up() {
    let lexicon = default_lexicon();
    let corpus = Corpus::from_text(
        "mary had a little lamb",
        "tiny",
        &lexicon,
        RhymeMode::default(),
    );
    let form = PoemForm::new("Couplet", "AA", &[('A', "0101010101")]);
    let config = GeneratorConfig {
        max_block_attempts: 3,
        ..seeded(5)
    };
    let err = Poem::new(&corpus, &form)
        .generate(&mut config.rng(), &config)
        .unwrap_err();
    assert!(matches!(err, PoetryError::GenerationFailed { .. }));
    assert!(
        err.to_string()
            .starts_with("could not generate a poem for the given style and pattern")
    );
}

#[test]
fn bundled_forms_on_bundled_corpora() {
    let lexicon = default_lexicon();
    let config = seeded(2024);
    let corpora =
        CorpusRegistry::from_dir(&data_dir().join("textinput"), &lexicon, config.rhyme_mode)
            .unwrap();
    let forms =
        PoemFormRegistry::from_path(&data_dir().join("config").join("poemforms.json")).unwrap();
    assert_eq!(corpora.names().collect::<Vec<_>>(), vec!["nursery", "sonnets"]);

    for corpus_name in ["nursery", "sonnets"] {
        let corpus = corpora.get(corpus_name).unwrap();
        for form_name in forms.names() {
            let form = forms.get(form_name).unwrap();
            let text = Poem::new(corpus, form)
                .generate(&mut config.rng(), &config)
                .unwrap_or_else(|e| panic!("{form_name} on {corpus_name}: {e}"));
            check_poem(corpus, form, &text);
        }
    }
}

#[test]
fn same_seed_same_poem() {
    let lexicon = default_lexicon();
    let text = std::fs::read_to_string(data_dir().join("textinput").join("nursery.txt")).unwrap();
    let corpus = Corpus::from_text(&text, "nursery", &lexicon, RhymeMode::default());
    let form = PoemForm::new("Quatrain", "ABAB", &[('A', "01010101"), ('B', "01010101")]);
    let poem = Poem::new(&corpus, &form);

    let config = seeded(99);
    let a = poem.generate(&mut config.rng(), &config).unwrap();
    let b = poem.generate(&mut config.rng(), &config).unwrap();
    assert_eq!(a, b);
}

fn poem_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_poem"));
    cmd.arg("--data-dir").arg(data_dir());
    cmd
}

#[test]
fn cli_lists_forms_and_corpora() {
    let out = poem_cmd().arg("--list").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Sonnet"), "{stdout}");
    assert!(stdout.contains("nursery"), "{stdout}");
}

#[test]
fn cli_seeded_runs_repeat() {
    let run = || {
        poem_cmd()
            .args(["--form", "Couplet", "--corpus", "sonnets", "--seed", "17"])
            .output()
            .unwrap()
    };
    let (a, b) = (run(), run());
    assert!(a.status.success());
    assert!(!a.stdout.is_empty());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn cli_unknown_corpus_exits_with_error() {
    let out = poem_cmd()
        .args(["--form", "Couplet", "--corpus", "beowulf"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("corpus not found: beowulf"), "{stderr}");
}
