//! Utilities for generating passwords and passphrases.

use crate::{GenerationError, Secret};

/// Always part of the alphabet.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Longest password that will be generated.
pub const MAX_LENGTH: usize = 4096;
/// Most words that will go into a passphrase.
pub const MAX_WORD_COUNT: usize = 1024;

/// A source of uniformly distributed indices.
///
/// Every `rand` generator is one; tests substitute a fixed sequence to make generation
/// deterministic.
pub trait IndexSource {
    /// Return an index in `0..len`. Callers never pass a `len` of zero.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: rand::RngCore> IndexSource for R {
    fn index(&mut self, len: usize) -> usize {
        // `gen_range` rejects and re-samples rather than taking a biased modulo.
        rand::Rng::gen_range(self, 0..len)
    }
}

/// Parameters for a random character password.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CharacterPolicy {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_digits: bool,
    pub include_symbols: bool,
}

impl CharacterPolicy {
    /// The alphabet this policy samples from: lowercase letters, then upper case letters, digits
    /// and symbols, each only if enabled.
    pub fn charset(&self) -> String {
        let mut charset = String::from(LOWERCASE);
        if self.include_uppercase {
            charset.push_str(UPPERCASE);
        }
        if self.include_digits {
            charset.push_str(DIGITS);
        }
        if self.include_symbols {
            charset.push_str(SYMBOLS);
        }
        charset
    }
}

/// Parameters for a passphrase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PassphrasePolicy {
    pub word_count: usize,
    /// Placed between consecutive words; may be empty.
    pub separator: String,
    pub word_list: Vec<String>,
}

/// Generate a password by independently sampling `policy.length` characters from the policy's
/// charset, with replacement.
pub fn generate_character_password<S>(
    source: &mut S,
    policy: &CharacterPolicy,
) -> Result<Secret, GenerationError>
where
    S: IndexSource + ?Sized,
{
    if policy.length == 0 {
        return Err(GenerationError::invalid("length", "must be at least 1"));
    }
    if policy.length > MAX_LENGTH {
        return Err(GenerationError::invalid(
            "length",
            format!("must be at most {MAX_LENGTH}, got {}", policy.length),
        ));
    }
    let alphabet = policy.charset().chars().collect::<Vec<_>>();
    let mut secret = String::with_capacity(policy.length);
    for _ in 0..policy.length {
        secret.push(alphabet[source.index(alphabet.len())]);
    }
    tracing::debug!(length = policy.length, charset_len = alphabet.len(), "generated password");
    Ok(Secret(secret))
}

/// Generate a passphrase of `policy.word_count` words drawn with replacement from the word list,
/// with the separator between consecutive words.
pub fn generate_passphrase<S>(
    source: &mut S,
    policy: &PassphrasePolicy,
) -> Result<Secret, GenerationError>
where
    S: IndexSource + ?Sized,
{
    if policy.word_count == 0 {
        return Err(GenerationError::invalid("word count", "must be at least 1"));
    }
    if policy.word_count > MAX_WORD_COUNT {
        return Err(GenerationError::invalid(
            "word count",
            format!("must be at most {MAX_WORD_COUNT}, got {}", policy.word_count),
        ));
    }
    if policy.word_list.is_empty() {
        return Err(GenerationError::invalid("word list", "contains no words"));
    }
    let words = (0..policy.word_count)
        .map(|_| policy.word_list[source.index(policy.word_list.len())].as_str())
        .collect::<Vec<_>>();
    tracing::debug!(
        word_count = policy.word_count,
        list_len = policy.word_list.len(),
        "generated passphrase"
    );
    Ok(Secret(words.join(&policy.separator)))
}

/// Parse a length or word count typed by a user.
///
/// Anything other than a positive whole number (empty input, garbage, zero, negatives) is an
/// `InvalidParameter` error rather than being coerced.
pub fn parse_count(parameter: &'static str, input: &str) -> Result<usize, GenerationError> {
    let trimmed = input.trim();
    let n = trimmed.parse::<i64>().map_err(|_| {
        GenerationError::invalid(parameter, format!("expected a whole number, got {trimmed:?}"))
    })?;
    if n <= 0 {
        return Err(GenerationError::invalid(
            parameter,
            format!("must be at least 1, got {n}"),
        ));
    }
    usize::try_from(n)
        .map_err(|_| GenerationError::invalid(parameter, format!("{n} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out a fixed sequence of indices, wrapping around.
    struct Sequence(Vec<usize>, usize);

    impl IndexSource for Sequence {
        fn index(&mut self, len: usize) -> usize {
            let i = self.0[self.1 % self.0.len()];
            self.1 += 1;
            assert!(i < len, "index {i} out of range for {len}");
            i
        }
    }

    fn policy(length: usize, upper: bool, digits: bool, symbols: bool) -> CharacterPolicy {
        CharacterPolicy {
            length,
            include_uppercase: upper,
            include_digits: digits,
            include_symbols: symbols,
        }
    }

    #[test]
    fn charset_is_composed_in_order() {
        assert_eq!(policy(1, false, false, false).charset(), LOWERCASE);
        assert_eq!(
            policy(1, true, true, true).charset(),
            format!("{LOWERCASE}{UPPERCASE}{DIGITS}{SYMBOLS}")
        );
        assert_eq!(
            policy(1, false, true, true).charset(),
            format!("{LOWERCASE}{DIGITS}{SYMBOLS}")
        );
    }

    #[test]
    fn symbol_set_matches_the_fixed_list() {
        assert_eq!(SYMBOLS.chars().count(), 26);
        assert!(SYMBOLS.chars().all(|c| c.is_ascii_punctuation()));
    }

    #[test]
    fn indices_select_from_composed_charset() {
        // 0 -> 'a', 26 -> 'A', 52 -> '0', 62 -> '!'
        let mut source = Sequence(vec![0, 26, 52, 62, 87], 0);
        let pw = generate_character_password(&mut source, &policy(5, true, true, true)).unwrap();
        assert_eq!(pw.as_str(), "aA0!?");
    }

    #[test]
    fn digits_follow_lowercase_when_uppercase_is_off() {
        let mut source = Sequence(vec![25, 26, 35], 0);
        let pw = generate_character_password(&mut source, &policy(3, false, true, false)).unwrap();
        assert_eq!(pw.as_str(), "z09");
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut rng = rand::thread_rng();
        let err = generate_character_password(&mut rng, &policy(0, true, true, true)).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidParameter {
                parameter: "length",
                ..
            }
        ));
    }

    #[test]
    fn oversized_requests_are_rejected_without_allocating() {
        let mut rng = rand::thread_rng();
        let pw = generate_character_password(&mut rng, &policy(MAX_LENGTH, true, true, true));
        assert_eq!(pw.unwrap().as_str().len(), MAX_LENGTH);
        for length in [MAX_LENGTH + 1, 100_000_000_000_000, usize::MAX] {
            assert!(matches!(
                generate_character_password(&mut rng, &policy(length, false, false, false)),
                Err(GenerationError::InvalidParameter {
                    parameter: "length",
                    ..
                })
            ));
        }

        let phrase = PassphrasePolicy {
            word_count: usize::MAX,
            separator: " ".into(),
            word_list: vec!["a".into()],
        };
        assert!(matches!(
            generate_passphrase(&mut rng, &phrase),
            Err(GenerationError::InvalidParameter {
                parameter: "word count",
                ..
            })
        ));
    }

    #[test]
    fn passphrase_joins_without_leading_or_trailing_separator() {
        let phrase = PassphrasePolicy {
            word_count: 3,
            separator: "-".to_owned(),
            word_list: vec!["alpha".into(), "bravo".into(), "charlie".into()],
        };
        let mut source = Sequence(vec![2, 0, 2], 0);
        let out = generate_passphrase(&mut source, &phrase).unwrap();
        assert_eq!(out.as_str(), "charlie-alpha-charlie");
    }

    #[test]
    fn passphrase_with_empty_separator_concatenates() {
        let phrase = PassphrasePolicy {
            word_count: 2,
            separator: String::new(),
            word_list: vec!["ab".into(), "cd".into()],
        };
        let mut source = Sequence(vec![1, 0], 0);
        assert_eq!(generate_passphrase(&mut source, &phrase).unwrap().as_str(), "cdab");
    }

    #[test]
    fn passphrase_rejects_bad_parameters() {
        let mut rng = rand::thread_rng();
        let no_words = PassphrasePolicy {
            word_count: 0,
            separator: " ".into(),
            word_list: vec!["a".into()],
        };
        assert!(generate_passphrase(&mut rng, &no_words).is_err());
        let empty_list = PassphrasePolicy {
            word_count: 4,
            separator: " ".into(),
            word_list: Vec::new(),
        };
        let err = generate_passphrase(&mut rng, &empty_list).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidParameter {
                parameter: "word list",
                ..
            }
        ));
    }

    #[test]
    fn parse_count_accepts_only_positive_numbers() {
        assert_eq!(parse_count("length", "12"), Ok(12));
        assert_eq!(parse_count("length", " 7 "), Ok(7));
        for bad in ["", "   ", "abc", "0", "-3", "1.5"] {
            assert!(parse_count("length", bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
