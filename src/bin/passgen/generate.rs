//! The one-shot `password`, `phrase` and `strength` commands.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use passgen::breach::{self, BreachError, BreachReport, PwnedPasswords};
use passgen::config::Config;
use passgen::password_generation::{self, parse_count};
use passgen::{CharacterPolicy, Secret, Strength};

use crate::ProgError;

#[derive(clap::Args)]
pub(crate) struct PasswordArgs {
    /// Number of characters.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_length)]
    length: Option<usize>,
    /// Include upper case letters.
    #[arg(long, overrides_with = "no_uppercase")]
    uppercase: bool,
    /// Leave upper case letters out.
    #[arg(long, overrides_with = "uppercase")]
    no_uppercase: bool,
    /// Include digits.
    #[arg(long, overrides_with = "no_digits")]
    digits: bool,
    /// Leave digits out.
    #[arg(long, overrides_with = "digits")]
    no_digits: bool,
    /// Include symbols.
    #[arg(long, overrides_with = "no_symbols")]
    symbols: bool,
    /// Leave symbols out.
    #[arg(long, overrides_with = "symbols")]
    no_symbols: bool,
    /// How many passwords to generate.
    #[arg(long, default_value = "1", allow_negative_numbers = true, value_parser = parse_how_many)]
    count: usize,
    /// Don't look the password up in the Pwned Passwords database.
    #[arg(long)]
    no_leak_check: bool,
    /// Copy the (last) generated password to the clipboard.
    #[arg(long)]
    copy: bool,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(crate) struct PhraseArgs {
    /// Number of words.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_word_count)]
    words: Option<usize>,
    /// Placed between words; may be empty.
    #[arg(long, allow_hyphen_values = true)]
    separator: Option<String>,
    /// A file with one word per line, instead of the configured or built-in list.
    #[arg(long)]
    word_list: Option<PathBuf>,
    /// Copy the passphrase to the clipboard.
    #[arg(long)]
    copy: bool,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn parse_length(s: &str) -> Result<usize, passgen::GenerationError> {
    parse_count("length", s)
}

fn parse_word_count(s: &str) -> Result<usize, passgen::GenerationError> {
    parse_count("word count", s)
}

fn parse_how_many(s: &str) -> Result<usize, passgen::GenerationError> {
    parse_count("count", s)
}

/// Fold a `--x`/`--no-x` pair into an override; `None` when neither was given.
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl PasswordArgs {
    /// The configured policy with this command's overrides applied.
    fn policy(&self, config: &Config) -> CharacterPolicy {
        let mut policy = config.character_policy();
        if let Some(length) = self.length {
            policy.length = length;
        }
        if let Some(uppercase) = flag_pair(self.uppercase, self.no_uppercase) {
            policy.include_uppercase = uppercase;
        }
        if let Some(digits) = flag_pair(self.digits, self.no_digits) {
            policy.include_digits = digits;
        }
        if let Some(symbols) = flag_pair(self.symbols, self.no_symbols) {
            policy.include_symbols = symbols;
        }
        policy
    }
}

#[derive(Serialize)]
struct PasswordOutput<'a> {
    password: &'a str,
    score: u8,
    strength: passgen::StrengthLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    breach: Option<BreachReport>,
}

/// A single password is printed as an object, several as an array.
fn to_json(outputs: &[PasswordOutput<'_>]) -> serde_json::Result<String> {
    match outputs {
        [single] => serde_json::to_string_pretty(single),
        _ => serde_json::to_string_pretty(outputs),
    }
}

pub(crate) fn password(config: &Config, args: PasswordArgs) -> Result<(), ProgError> {
    let policy = args.policy(config);
    let leak_check = config.leak_check && !args.no_leak_check;

    let mut rng = rand::thread_rng();
    let generated = (0..args.count)
        .map(|_| {
            let secret = password_generation::generate_character_password(&mut rng, &policy)?;
            let strength = passgen::classify(secret.as_str());
            Ok::<_, passgen::GenerationError>((secret, strength))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        // JSON consumers get the leak check results inline.
        let lookup = leak_lookup(leak_check, PwnedPasswords::new);
        let outputs = generated
            .iter()
            .map(|(secret, strength)| PasswordOutput {
                password: secret.as_str(),
                score: strength.score,
                strength: strength.label,
                breach: lookup
                    .as_ref()
                    .and_then(|l| leak_check_or_warn(l, secret)),
            })
            .collect::<Vec<_>>();
        let json = to_json(&outputs).context("failed to serialize output")?;
        println!("{json}");
    } else {
        if let [(secret, strength)] = generated.as_slice() {
            println!("{}", secret.as_str());
            eprintln!("{}", crate::meter::render(*strength));
        } else {
            print_table(&generated, io::stdout()).context("failed to output table")?;
        }
        if let Some(lookup) = leak_lookup(leak_check, PwnedPasswords::new) {
            for (secret, _) in generated.iter() {
                if let Some(report) = leak_check_or_warn(&lookup, secret) {
                    if report.found {
                        eprintln!("{}", crate::meter::breach_warning(&report));
                    }
                }
            }
        }
    }

    if args.copy {
        if let Some((secret, _)) = generated.last() {
            crate::clipboard::copy(secret)?;
        }
    }
    Ok(())
}

pub(crate) fn phrase(config: &Config, args: PhraseArgs) -> Result<(), ProgError> {
    let mut policy = match args.word_list {
        Some(path) => Config {
            word_list: Some(path),
            ..config.clone()
        }
        .passphrase_policy()?,
        None => config.passphrase_policy()?,
    };
    if let Some(words) = args.words {
        policy.word_count = words;
    }
    if let Some(separator) = args.separator {
        policy.separator = separator;
    }

    let secret = password_generation::generate_passphrase(&mut rand::thread_rng(), &policy)?;
    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({ "passphrase": secret }))
            .context("failed to serialize output")?;
        println!("{json}");
    } else {
        println!("{}", secret.as_str());
    }
    if args.copy {
        crate::clipboard::copy(&secret)?;
    }
    Ok(())
}

pub(crate) fn strength(password: Option<String>) -> Result<(), ProgError> {
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")
            .context("failed to read password from TTY")?,
    };
    println!("{}", crate::meter::render(passgen::classify(&password)));
    Ok(())
}

/// The leak check client when the check is enabled, or `None` (with a warning) if it can't be set
/// up. Setup failures never fail the command.
fn leak_lookup<L, F>(enabled: bool, setup: F) -> Option<L>
where
    F: FnOnce() -> Result<L, BreachError>,
{
    if !enabled {
        return None;
    }
    match setup() {
        Ok(lookup) => Some(lookup),
        Err(err) => {
            tracing::warn!(error = %err, "leak check failed (offline?)");
            None
        }
    }
}

/// Run the leak check; a failure is only logged, it never fails the command.
fn leak_check_or_warn(lookup: &PwnedPasswords, secret: &Secret) -> Option<BreachReport> {
    match breach::check(lookup, secret.as_str()) {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::warn!(error = %err, "leak check failed (offline?)");
            None
        }
    }
}

fn print_table(generated: &[(Secret, Strength)], output: impl Write) -> io::Result<()> {
    struct Row<'a>(&'a Secret, Strength);

    impl crate::table::TableDisplay for Row<'_> {
        fn columns() -> usize {
            3
        }

        fn column_name(column_index: usize) -> &'static str {
            match column_index {
                0 => "Password",
                1 => "Score",
                2 => "Strength",
                _ => unreachable!(),
            }
        }

        fn item(&self, column_index: usize) -> Cow<'_, str> {
            match column_index {
                0 => Cow::from(self.0.as_str()),
                1 => Cow::from(self.1.score.to_string()),
                2 => Cow::from(self.1.label.to_string()),
                _ => unreachable!(),
            }
        }
    }

    let rows = generated
        .iter()
        .map(|(secret, strength)| Row(secret, *strength))
        .collect::<Vec<_>>();
    crate::table::display_table(&rows, output)
}
