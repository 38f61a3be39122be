//! A heuristic strength meter for character passwords.

use std::fmt;

use serde::Serialize;

/// Passwords at least this long get the length bonus.
pub const LENGTH_THRESHOLD: usize = 12;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    fn from_score(score: u8) -> StrengthLabel {
        if score < 40 {
            StrengthLabel::Weak
        } else if score < 80 {
            StrengthLabel::Medium
        } else {
            StrengthLabel::Strong
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Strength {
    /// 0 to 100, in steps of 20.
    pub score: u8,
    pub label: StrengthLabel,
}

/// Score a password: 40 points for being at least 12 characters long, and 20 points each for
/// containing an upper case ASCII letter, an ASCII digit, and anything outside of `[A-Za-z0-9]`.
pub fn classify(password: &str) -> Strength {
    let mut score = 0;
    // Length counts characters, not bytes.
    if password.chars().count() >= LENGTH_THRESHOLD {
        score += 40;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 20;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 20;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 20;
    }
    Strength {
        score,
        label: StrengthLabel::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_weak() {
        assert_eq!(
            classify(""),
            Strength {
                score: 0,
                label: StrengthLabel::Weak
            }
        );
    }

    #[test]
    fn twelve_lowercase_is_medium() {
        let s = classify("aaaaaaaaaaaa");
        assert_eq!(s.score, 40);
        assert_eq!(s.label, StrengthLabel::Medium);
    }

    #[test]
    fn everything_is_strong() {
        let s = classify("Aa1!Aa1!Aa1!");
        assert_eq!(s.score, 100);
        assert_eq!(s.label, StrengthLabel::Strong);
    }

    #[test]
    fn length_bonus_starts_at_twelve() {
        assert_eq!(classify("aaaaaaaaaaa").score, 0);
        assert_eq!(classify("aaaaaaaaaaaa").score, 40);
    }

    #[test]
    fn label_boundaries() {
        // 20: only a digit.
        assert_eq!(classify("abc1").label, StrengthLabel::Weak);
        // 60: digit, upper case, symbol; short.
        assert_eq!(classify("A1!").label, StrengthLabel::Medium);
        // 80: long plus two classes.
        let s = classify("aaaaaaaaaaA1");
        assert_eq!(s.score, 80);
        assert_eq!(s.label, StrengthLabel::Strong);
    }

    #[test]
    fn non_ascii_counts_as_symbol() {
        assert_eq!(classify("é").score, 20);
        assert_eq!(classify("pass word").score, 20);
    }

    #[test]
    fn classification_is_repeatable() {
        let pw = String::from("Tr0ub4dor&3");
        let first = classify(&pw);
        assert_eq!(first, classify(&pw));
        assert_eq!(pw, "Tr0ub4dor&3");
    }
}
