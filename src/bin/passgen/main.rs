use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passgen::config::Config;

mod clipboard;
mod generate;
mod interactive;
mod meter;
mod table;

#[derive(Parser)]
#[command(name = "passgen", version, about = "Generate passwords and passphrases")]
struct Args {
    /// Read configuration from this file instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate a random character password, rate it, and check it against known breaches.
    #[command(alias = "pw")]
    Password(generate::PasswordArgs),
    /// Generate a passphrase from a word list.
    Phrase(generate::PhraseArgs),
    /// Rate the strength of an existing password.
    Strength {
        /// The password to rate; prompted for (without echo) if omitted.
        password: Option<String>,
    },
    /// Generate, copy and export credentials from a menu. Passwords expire after 30 seconds.
    Interactive,
    /// Decrypt a file written by the export menu entry.
    Decrypt {
        /// Defaults to the configured export file.
        file: Option<PathBuf>,
    },
}

fn run() -> Result<(), ProgError> {
    let args = Args::parse();
    let config = load_config(args.config)?;

    match args.command {
        Command::Password(pw_args) => generate::password(&config, pw_args)?,
        Command::Phrase(phrase_args) => generate::phrase(&config, phrase_args)?,
        Command::Strength { password } => generate::strength(password)?,
        Command::Interactive => interactive::run(&config)?,
        Command::Decrypt { file } => {
            let file = file.unwrap_or_else(|| config.export_file.clone());
            let key = passgen::Secret::from(
                rpassword::prompt_password("Key: ").context("failed to read key from TTY")?,
            );
            let plain = passgen::export::read_export(&file, &key)?;
            println!("{}", plain.as_str());
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "passgen=warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    match run() {
        Ok(()) => (),
        Err(ProgError::Other(err)) => {
            eprintln!("Error: {err:?}");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, ProgError> {
    let config = match path {
        Some(p) => Config::load(&p)?,
        None => Config::load_default()?,
    };
    Ok(config)
}

#[derive(Debug, thiserror::Error)]
enum ProgError {
    #[error("Keys did not match.")]
    KeysDidntMatch,
    #[error("Export aborted; no key given.")]
    ExportAborted,
    #[error("Nothing to {0}; generate something first.")]
    NothingGenerated(&'static str),
    #[error("The password has expired; generate a new one.")]
    Expired,
    #[error("{0}")]
    Generation(#[from] passgen::GenerationError),
    #[error("{0}")]
    Config(#[from] passgen::config::ConfigError),
    #[error("{0}")]
    WordList(#[from] passgen::words::WordListError),
    #[error("Export failed: {0}")]
    Export(#[from] passgen::export::ExportError),
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ProgError {
    fn from(err: anyhow::Error) -> ProgError {
        ProgError::Other(err)
    }
}
