//! Checking whether a password appears in a known breach, using the k-anonymity range API of
//! Pwned Passwords: only the first five hex digits of the password's SHA-1 leave the machine.

use std::thread;
use std::time::Duration;

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::Secret;

pub const DEFAULT_RANGE_URL: &str = "https://api.pwnedpasswords.com/range/";

const PREFIX_LEN: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum BreachError {
    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("range request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("malformed line in range response: {0:?}")]
    MalformedResponse(String),
}

/// Something that can answer a range query: given the first five upper case hex digits of a SHA-1
/// digest, return the matching suffixes as `SUFFIX:COUNT` lines.
pub trait RangeLookup {
    fn range(&self, prefix: &str) -> Result<String, BreachError>;
}

impl<L: RangeLookup + ?Sized> RangeLookup for &L {
    fn range(&self, prefix: &str) -> Result<String, BreachError> {
        (**self).range(prefix)
    }
}

/// The public Pwned Passwords service, over HTTPS.
pub struct PwnedPasswords {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PwnedPasswords {
    pub fn new() -> Result<PwnedPasswords, BreachError> {
        PwnedPasswords::with_base_url(DEFAULT_RANGE_URL)
    }

    /// `base_url` has the prefix appended to it directly, so it should end with a `/`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<PwnedPasswords, BreachError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("passgen/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(BreachError::Client)?;
        Ok(PwnedPasswords {
            client,
            base_url: base_url.into(),
        })
    }
}

impl RangeLookup for PwnedPasswords {
    fn range(&self, prefix: &str) -> Result<String, BreachError> {
        let url = format!("{}{}", self.base_url, prefix);
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(BreachError::Http)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BreachReport {
    pub found: bool,
    /// How many times the password was seen in breaches.
    pub count: u64,
}

/// The upper case hex SHA-1 of the password.
pub fn digest(password: &str) -> String {
    hex::encode_upper(Sha1::digest(password.as_bytes()))
}

/// Look the password up. Only the digest prefix is passed to `lookup`.
pub fn check<L>(lookup: &L, password: &str) -> Result<BreachReport, BreachError>
where
    L: RangeLookup + ?Sized,
{
    let digest = digest(password);
    let (prefix, suffix) = digest.split_at(PREFIX_LEN);
    let body = lookup.range(prefix)?;
    let count = find_suffix(&body, suffix)?.unwrap_or(0);
    tracing::debug!(prefix, found = count > 0, "leak check finished");
    Ok(BreachReport {
        found: count > 0,
        count,
    })
}

/// Run [`check`] on its own thread and hand the outcome to `report`, so that the caller is never
/// held up by the network.
pub fn spawn_check<L, F>(lookup: L, password: Secret, report: F) -> thread::JoinHandle<()>
where
    L: RangeLookup + Send + 'static,
    F: FnOnce(Result<BreachReport, BreachError>) + Send + 'static,
{
    thread::spawn(move || report(check(&lookup, password.as_str())))
}

fn find_suffix(body: &str, suffix: &str) -> Result<Option<u64>, BreachError> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (candidate, count) = line
            .split_once(':')
            .ok_or_else(|| BreachError::MalformedResponse(line.to_owned()))?;
        if candidate.eq_ignore_ascii_case(suffix) {
            let count = count
                .trim()
                .parse::<u64>()
                .map_err(|_| BreachError::MalformedResponse(line.to_owned()))?;
            // Padded responses contain decoy suffixes with a count of zero.
            return Ok(Some(count));
        }
    }
    Ok(None)
}
