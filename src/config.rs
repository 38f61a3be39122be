//! User configuration, read from a YAML file.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_EXPORT_FILE;
use crate::password_generation::{CharacterPolicy, PassphrasePolicy};
use crate::words::{self, WordListError};
use crate::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: GenerationError,
    },
    #[error("neither XDG_CONFIG_HOME nor HOME is set; cannot find the config directory")]
    NoConfigDir,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub length: usize,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub word_count: usize,
    pub separator: String,
    /// A file with one word per line; the built-in list when unset.
    pub word_list: Option<PathBuf>,
    /// Look generated passwords up in the Pwned Passwords database.
    pub leak_check: bool,
    pub export_file: PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            length: 16,
            uppercase: true,
            digits: true,
            symbols: true,
            word_count: 4,
            separator: String::from("-"),
            word_list: None,
            leak_check: true,
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

impl Config {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        // An empty file deserializes as YAML null, not as an empty map.
        let config = if text.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str::<Config>(&text).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?
        };
        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_owned(),
            source,
        })?;
        Ok(config)
    }

    /// Load the config from the default location.
    pub fn load_default() -> Result<Config, ConfigError> {
        Config::load(&default_path()?)
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.length == 0 {
            return Err(GenerationError::invalid("length", "must be at least 1"));
        }
        if self.word_count == 0 {
            return Err(GenerationError::invalid("word count", "must be at least 1"));
        }
        Ok(())
    }

    pub fn character_policy(&self) -> CharacterPolicy {
        CharacterPolicy {
            length: self.length,
            include_uppercase: self.uppercase,
            include_digits: self.digits,
            include_symbols: self.symbols,
        }
    }

    /// Build the passphrase policy, reading the configured word list if there is one.
    pub fn passphrase_policy(&self) -> Result<PassphrasePolicy, WordListError> {
        let word_list = match self.word_list.as_deref() {
            Some(path) => words::load(path)?,
            None => words::builtin(),
        };
        Ok(PassphrasePolicy {
            word_count: self.word_count,
            separator: self.separator.clone(),
            word_list,
        })
    }
}

/// `$XDG_CONFIG_HOME/passgen/config.yaml`, falling back to `$HOME/.config/passgen/config.yaml`.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let base = match env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let home = env::var_os("HOME").ok_or(ConfigError::NoConfigDir)?;
            let mut p = PathBuf::from(home);
            p.push(".config");
            p
        }
    };
    let mut path = base;
    path.push("passgen");
    path.push("config.yaml");
    Ok(path)
}
