// Random Poetry Generator: CLI entry point.
//
// Loads the pronouncing dictionary, the poem form catalog and every corpus
// under the data directory, then prints one poem.
//
// Usage:
//   cargo run -p random_poetry_core -- --form Couplet --corpus nursery
//   cargo run -p random_poetry_core -- --random [--seed N]
//   cargo run -p random_poetry_core -- --list
//
// Data layout (under --data-dir, default `data`):
//   config/poemforms.json   form catalog
//   config/generator.json   optional generator config (or --config PATH)
//   textinput/*.txt         corpora, named by file stem
//
// `RUST_LOG` overrides the log filter; `-v` turns on debug logging.

use clap::Parser;
use random_poetry_core::{
    CorpusRegistry, GeneratorConfig, Poem, PoemFormRegistry, PoetryError, Result,
};
use random_poetry_lexicon::{Lexicon, default_lexicon};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "poem", about = "Generate a metered, rhyming poem from a corpus")]
struct Cli {
    /// Directory holding config/ and textinput/.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Poem form name, as listed in the form catalog.
    #[arg(long, required_unless_present_any = ["random", "list"])]
    form: Option<String>,

    /// Corpus name (text file stem under textinput/).
    #[arg(long, required_unless_present_any = ["random", "list"])]
    corpus: Option<String>,

    /// Pick a random form and corpus.
    #[arg(long, conflicts_with_all = ["form", "corpus"])]
    random: bool,

    /// List available forms and corpora, then exit.
    #[arg(long)]
    list: bool,

    /// PRNG seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Generator config file. Defaults to config/generator.json under the
    /// data directory, if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CMU-format pronouncing dictionary. Defaults to the bundled sample.
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "random_poetry_core=debug,random_poetry_lexicon=debug,info"
    } else {
        "random_poetry_core=info,random_poetry_lexicon=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_path(path)?,
        None => {
            let path = cli.data_dir.join("config").join("generator.json");
            if path.exists() {
                GeneratorConfig::from_path(&path)?
            } else {
                GeneratorConfig::default()
            }
        }
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    debug!("Generator config: {config:?}");
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let lexicon = match &cli.lexicon {
        Some(path) => Lexicon::from_path(path)?,
        None => default_lexicon(),
    };
    info!("Lexicon: {} words", lexicon.len());

    let forms = PoemFormRegistry::from_path(&cli.data_dir.join("config").join("poemforms.json"))?;
    let corpora =
        CorpusRegistry::from_dir(&cli.data_dir.join("textinput"), &lexicon, config.rhyme_mode)?;

    if cli.list {
        println!("Forms:");
        for name in forms.names() {
            println!("  {name}");
        }
        println!("Corpora:");
        for name in corpora.names() {
            println!("  {name}");
        }
        return Ok(());
    }

    let mut rng = config.rng();
    let (form, corpus) = if cli.random {
        let form = forms
            .choose(&mut rng)
            .ok_or_else(|| PoetryError::not_found("poem form", "(catalog is empty)"))?;
        let corpus = corpora
            .choose(&mut rng)
            .ok_or_else(|| PoetryError::not_found("corpus", "(no corpora loaded)"))?;
        (form, corpus)
    } else {
        let form_name = cli.form.as_deref().unwrap_or_default();
        let corpus_name = cli.corpus.as_deref().unwrap_or_default();
        (forms.get(form_name)?, corpora.get(corpus_name)?)
    };

    let text = Poem::new(corpus, form).generate(&mut rng, &config)?;
    println!("{}\n", form.name);
    println!("{text}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
