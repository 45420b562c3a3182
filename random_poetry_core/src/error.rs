// Error type for loading resources and generating poems.
//
// Only failures a caller must act on are errors. A word missing from the
// pronouncing dictionary is skipped silently, and a line or block search
// that runs dry returns `None` so the caller can retry. A poem that cannot
// be finished after the configured number of retries becomes
// `GenerationFailed`.

use random_poetry_lexicon::LexiconError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoetryError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid poem form '{form}': {reason}")]
    InvalidForm { form: String, reason: String },

    #[error(
        "could not generate a poem for the given style and pattern (form '{form}', corpus '{corpus}')"
    )]
    GenerationFailed { form: String, corpus: String },
}

impl PoetryError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        PoetryError::NotFound {
            kind,
            name: name.into(),
        }
    }
}

impl From<LexiconError> for PoetryError {
    fn from(err: LexiconError) -> Self {
        match err {
            LexiconError::NotFound(name) => PoetryError::not_found("pronouncing dictionary", name),
            LexiconError::Io(e) => PoetryError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PoetryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failed_message() {
        let err = PoetryError::GenerationFailed {
            form: "Sonnet".into(),
            corpus: "nursery".into(),
        };
        assert!(
            err.to_string()
                .starts_with("could not generate a poem for the given style and pattern")
        );
    }

    #[test]
    fn test_lexicon_not_found_converts() {
        let err: PoetryError = LexiconError::NotFound("cmudict.dict".into()).into();
        assert!(matches!(
            err,
            PoetryError::NotFound {
                kind: "pronouncing dictionary",
                ..
            }
        ));
    }
}
