use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use passgen::expiry::PASSWORD_LIFETIME;
use passgen::session::Credential;
use passgen::{CharacterPolicy, GenerationMode, IndexSource, PassphrasePolicy, Session};

/// Always picks the first candidate.
struct First;

impl IndexSource for First {
    fn index(&mut self, _len: usize) -> usize {
        0
    }
}

fn character_policy() -> CharacterPolicy {
    CharacterPolicy {
        length: 12,
        include_uppercase: true,
        include_digits: true,
        include_symbols: true,
    }
}

fn passphrase_policy() -> PassphrasePolicy {
    PassphrasePolicy {
        word_count: 3,
        separator: ".".into(),
        word_list: vec!["otter".into(), "maple".into()],
    }
}

fn session(lifetime: Duration) -> Session<First> {
    Session::new(First, character_policy(), passphrase_policy()).with_lifetime(lifetime)
}

#[test]
fn nothing_is_current_before_generating() {
    let session = session(PASSWORD_LIFETIME);
    assert_eq!(session.mode(), GenerationMode::CharacterPassword);
    assert!(session.current().is_none());
    assert!(!session.is_expired());
}

#[test]
fn password_is_classified_and_current() {
    let mut session = session(PASSWORD_LIFETIME);
    let credential = session.generate().unwrap();
    assert_eq!(credential.secret().as_str(), "aaaaaaaaaaaa");
    let strength = credential.strength().unwrap();
    assert_eq!(strength.score, 40);
    assert_eq!(
        session.current().unwrap().secret().as_str(),
        "aaaaaaaaaaaa"
    );
}

#[test]
fn passphrase_is_never_classified() {
    let mut session = session(PASSWORD_LIFETIME);
    let credential = session.switch_mode(GenerationMode::Passphrase).unwrap();
    assert_eq!(session.mode(), GenerationMode::Passphrase);
    assert!(matches!(credential, Credential::Passphrase { .. }));
    assert!(credential.strength().is_none());
    assert_eq!(credential.secret().as_str(), "otter.otter.otter");
}

#[test]
fn password_expires_after_its_lifetime() {
    let expired = Arc::new(AtomicUsize::new(0));
    let counter = expired.clone();
    let mut session = session(Duration::from_millis(50)).on_expiry(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    session.generate().unwrap();
    assert!(session.current().is_some());

    thread::sleep(Duration::from_millis(400));
    assert!(session.current().is_none());
    assert!(session.is_expired());
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[test]
fn regenerating_replaces_the_pending_expiry() {
    let expired = Arc::new(AtomicUsize::new(0));
    let counter = expired.clone();
    let mut session = session(Duration::from_millis(300)).on_expiry(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    session.generate().unwrap();
    thread::sleep(Duration::from_millis(200));
    session.generate().unwrap();
    thread::sleep(Duration::from_millis(200));
    // 400ms after the first password, but only 200ms after the second.
    assert!(session.current().is_some());
    assert_eq!(expired.load(Ordering::SeqCst), 0);

    thread::sleep(Duration::from_millis(400));
    assert!(session.current().is_none());
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[test]
fn passphrases_do_not_expire_and_cancel_password_expiry() {
    let expired = Arc::new(AtomicUsize::new(0));
    let counter = expired.clone();
    let mut session = session(Duration::from_millis(50)).on_expiry(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    session.generate().unwrap();
    session.switch_mode(GenerationMode::Passphrase).unwrap();
    thread::sleep(Duration::from_millis(300));
    assert_eq!(
        session.current().unwrap().secret().as_str(),
        "otter.otter.otter"
    );
    assert!(!session.is_expired());
    assert_eq!(expired.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_generation_keeps_the_previous_credential() {
    let mut session = session(PASSWORD_LIFETIME);
    session.generate().unwrap();
    session.passphrase_policy_mut().word_list.clear();
    assert!(session.switch_mode(GenerationMode::Passphrase).is_err());
    assert_eq!(
        session.current().unwrap().secret().as_str(),
        "aaaaaaaaaaaa"
    );
}
