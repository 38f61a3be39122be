//! Word lists for passphrases.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::GenerationError;

static BUILTIN: &str = include_str!("words.txt");

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("failed to read word list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] GenerationError),
}

/// The word list compiled into the binary.
pub fn builtin() -> Vec<String> {
    parse(BUILTIN)
}

/// Read a word list with one word per line. Blank lines and surrounding whitespace are ignored;
/// a file with no words is rejected.
pub fn load(path: &Path) -> Result<Vec<String>, WordListError> {
    let text = fs::read_to_string(path).map_err(|source| WordListError::Read {
        path: path.to_owned(),
        source,
    })?;
    let words = parse(&text);
    if words.is_empty() {
        return Err(GenerationError::invalid(
            "word list",
            format!("{} contains no words", path.display()),
        )
        .into());
    }
    tracing::debug!(path = %path.display(), words = words.len(), "loaded word list");
    Ok(words)
}

fn parse(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
