//! Random password and passphrase generation, with a strength meter, a leak check against the
//! Pwned Passwords range API, and passphrase-encrypted export.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod breach;
pub mod config;
pub mod expiry;
pub mod export;
pub mod password_generation;
pub mod session;
pub mod strength;
pub mod words;

pub use password_generation::{CharacterPolicy, IndexSource, PassphrasePolicy};
pub use session::Session;
pub use strength::{classify, Strength, StrengthLabel};

/// Which kind of credential gets generated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationMode {
    /// A random string sampled from a character set. Classified and subject to expiry.
    CharacterPassword,
    /// Words from a word list, joined by a separator. Never classified, never expires.
    Passphrase,
}

impl GenerationMode {
    /// The other mode.
    pub fn toggled(self) -> GenerationMode {
        match self {
            GenerationMode::CharacterPassword => GenerationMode::Passphrase,
            GenerationMode::Passphrase => GenerationMode::CharacterPassword,
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::CharacterPassword => f.write_str("password"),
            GenerationMode::Passphrase => f.write_str("passphrase"),
        }
    }
}

/// Generation parameters were outside of their domain.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

impl GenerationError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> GenerationError {
        GenerationError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// A generated credential. `Debug` does not reveal the contents.
#[derive(Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

opaque_debug::implement!(Secret);

impl Secret {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Secret {
        Secret(s)
    }
}
