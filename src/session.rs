//! The state behind an interactive generator: the selected mode, the credential on display, and
//! the pending expiry of that credential.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::expiry::{ExpiryTimer, PASSWORD_LIFETIME};
use crate::password_generation::{self, CharacterPolicy, IndexSource, PassphrasePolicy};
use crate::strength::{self, Strength};
use crate::{GenerationError, GenerationMode, Secret};

/// A generated credential, as shown to the user.
#[derive(Clone, Debug)]
pub enum Credential {
    Password { secret: Secret, strength: Strength },
    Passphrase { secret: Secret },
}

impl Credential {
    pub fn secret(&self) -> &Secret {
        match self {
            Credential::Password { secret, .. } | Credential::Passphrase { secret } => secret,
        }
    }

    /// Only character passwords are classified.
    pub fn strength(&self) -> Option<Strength> {
        match self {
            Credential::Password { strength, .. } => Some(*strength),
            Credential::Passphrase { .. } => None,
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self {
            Credential::Password { .. } => GenerationMode::CharacterPassword,
            Credential::Passphrase { .. } => GenerationMode::Passphrase,
        }
    }
}

struct Shown {
    /// Bumped on every generation, so that an expiry armed for an older credential is ignored.
    generation: u64,
    credential: Option<Credential>,
    generated_at: Instant,
    expired: bool,
}

type ExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// Generates credentials in the selected mode and tracks whether the last one is still valid.
///
/// A character password is valid for [`PASSWORD_LIFETIME`] after generation; a passphrase does
/// not expire.
pub struct Session<S> {
    mode: GenerationMode,
    character_policy: CharacterPolicy,
    passphrase_policy: PassphrasePolicy,
    source: S,
    lifetime: Duration,
    shown: Arc<Mutex<Shown>>,
    timer: ExpiryTimer,
    on_expiry: Option<ExpiryHook>,
}

impl<S: IndexSource> Session<S> {
    /// A session in character password mode, with nothing generated yet.
    pub fn new(
        source: S,
        character_policy: CharacterPolicy,
        passphrase_policy: PassphrasePolicy,
    ) -> Session<S> {
        Session {
            mode: GenerationMode::CharacterPassword,
            character_policy,
            passphrase_policy,
            source,
            lifetime: PASSWORD_LIFETIME,
            shown: Arc::new(Mutex::new(Shown {
                generation: 0,
                credential: None,
                generated_at: Instant::now(),
                expired: false,
            })),
            timer: ExpiryTimer::new(),
            on_expiry: None,
        }
    }

    /// Override how long character passwords stay valid.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Session<S> {
        self.lifetime = lifetime;
        self
    }

    /// Called from the timer thread when the credential on display expires.
    pub fn on_expiry<F>(mut self, hook: F) -> Session<S>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_expiry = Some(Arc::new(hook));
        self
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn character_policy(&self) -> &CharacterPolicy {
        &self.character_policy
    }

    pub fn character_policy_mut(&mut self) -> &mut CharacterPolicy {
        &mut self.character_policy
    }

    pub fn passphrase_policy(&self) -> &PassphrasePolicy {
        &self.passphrase_policy
    }

    pub fn passphrase_policy_mut(&mut self) -> &mut PassphrasePolicy {
        &mut self.passphrase_policy
    }

    /// Select a mode and generate a credential in it.
    pub fn switch_mode(&mut self, mode: GenerationMode) -> Result<Credential, GenerationError> {
        self.mode = mode;
        self.generate()
    }

    /// Generate a new credential in the current mode, replacing the one on display.
    ///
    /// Any pending expiry is cancelled; a character password arms a new one. If generation fails
    /// nothing changes.
    pub fn generate(&mut self) -> Result<Credential, GenerationError> {
        let credential = match self.mode {
            GenerationMode::CharacterPassword => {
                let secret = password_generation::generate_character_password(
                    &mut self.source,
                    &self.character_policy,
                )?;
                let strength = strength::classify(secret.as_str());
                Credential::Password { secret, strength }
            }
            GenerationMode::Passphrase => Credential::Passphrase {
                secret: password_generation::generate_passphrase(
                    &mut self.source,
                    &self.passphrase_policy,
                )?,
            },
        };

        self.timer.cancel();
        let generation = {
            let mut shown = lock(&self.shown);
            shown.generation += 1;
            shown.credential = Some(credential.clone());
            shown.generated_at = Instant::now();
            shown.expired = false;
            shown.generation
        };
        if self.mode == GenerationMode::CharacterPassword {
            self.arm_expiry(generation);
        }
        Ok(credential)
    }

    fn arm_expiry(&mut self, generation: u64) {
        let shown = Arc::clone(&self.shown);
        let hook = self.on_expiry.clone();
        self.timer.arm(self.lifetime, move || {
            {
                let mut shown = lock(&shown);
                if shown.generation != generation {
                    return;
                }
                shown.expired = true;
            }
            tracing::info!("password expired");
            if let Some(hook) = hook {
                hook();
            }
        });
    }

    /// The credential on display, if there is one and it has not expired.
    pub fn current(&self) -> Option<Credential> {
        let shown = lock(&self.shown);
        if self.is_stale(&shown) {
            return None;
        }
        shown.credential.clone()
    }

    /// Whether the credential on display is a character password that has expired.
    pub fn is_expired(&self) -> bool {
        self.is_stale(&lock(&self.shown))
    }

    fn is_stale(&self, shown: &Shown) -> bool {
        matches!(shown.credential, Some(Credential::Password { .. }))
            && (shown.expired || shown.generated_at.elapsed() >= self.lifetime)
    }
}

fn lock(shown: &Mutex<Shown>) -> MutexGuard<'_, Shown> {
    // The guarded data stays consistent even if a holder panicked.
    shown.lock().unwrap_or_else(PoisonError::into_inner)
}
