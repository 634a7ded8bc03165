use chrono::{DateTime, Duration, Utc};

use crate::errors::CoreError;
use crate::security::biometric::{BiometricAuthenticator, BiometricOutcome};
use crate::storage::secure_store::SecureStore;

/// PIN attempts allowed per cycle before a lockout.
pub const MAX_ATTEMPTS: u32 = 5;

/// Lockout durations in seconds, indexed by `lock_count - 1`.
/// A lock count past the end reuses the last entry.
pub const LOCK_DURATIONS_SECS: [i64; 3] = [30, 60, 120];

/// Lock count at which timed locks stop and recovery becomes mandatory.
pub const RECOVERY_THRESHOLD: i64 = 3;

/// Secure-store key for the configured PIN.
pub const PIN_KEY: &str = "user_pin";

/// Secure-store key for the number of exhausted attempt cycles.
pub const LOCK_COUNT_KEY: &str = "lock_count";

/// Secure-store key for the lockout expiry (epoch seconds, 0 = no lock).
pub const UNLOCK_AT_KEY: &str = "unlock_at";

/// Where the unlock flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    /// Ready for a PIN, with this many attempts left in the cycle
    AwaitingInput { attempts_left: u32 },
    /// Timed lockout; input is rejected until `until`
    Locked { until: DateTime<Utc> },
    /// Too many lockouts — only the out-of-band recovery path remains
    RecoveryRequired,
    /// Success; terminal for this session
    Unlocked,
}

/// Outcome of one PIN submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    /// Correct PIN; counters reset and persisted
    Unlocked,
    /// Wrong PIN, cycle not yet exhausted
    WrongPin { attempts_left: u32 },
    /// This (or an earlier) submission exhausted the cycle; input is
    /// rejected without consuming attempts until `until`
    LockedOut { until: DateTime<Utc> },
    /// Lock count reached the recovery threshold
    RecoveryRequired,
}

/// The PIN/lockout state machine gating the app (or the credentials
/// section — both lock screens share this one component, differing only
/// in what they do on success).
///
/// Durable state lives in the `secure_prefs` store (`user_pin`,
/// `lock_count`, `unlock_at`); attempts-left is session state and resets
/// to 5 whenever a lock expires or a new session starts. Time enters
/// through explicit `now` parameters so the countdown survives restarts
/// (only the absolute expiry is persisted) and tests never sleep.
///
/// Leaving `RecoveryRequired` needs the coordinate-card recovery flow,
/// which does not exist yet; until then the only way out is the
/// administrative [`reset_lockout`](Self::reset_lockout).
#[derive(Debug)]
pub struct UnlockMachine<S: SecureStore> {
    store: S,
    attempts_left: u32,
    unlocked: bool,
}

impl<S: SecureStore> UnlockMachine<S> {
    /// Start a fresh unlock session over persisted state.
    pub fn new(store: S) -> Self {
        Self {
            store,
            attempts_left: MAX_ATTEMPTS,
            unlocked: false,
        }
    }

    /// Whether a PIN has been configured at all (setup gate).
    pub fn has_pin(&self) -> Result<bool, CoreError> {
        Ok(self.store.get_string(PIN_KEY)?.is_some())
    }

    /// Current state as of `now`, derived from session + persisted fields.
    pub fn state(&self, now: DateTime<Utc>) -> Result<UnlockState, CoreError> {
        if self.unlocked {
            return Ok(UnlockState::Unlocked);
        }
        // Recovery wins over any timed lock still on the clock.
        if self.lock_count()? >= RECOVERY_THRESHOLD {
            return Ok(UnlockState::RecoveryRequired);
        }
        if let Some(until) = self.lock_expiry()? {
            if now < until {
                return Ok(UnlockState::Locked { until });
            }
        }
        Ok(UnlockState::AwaitingInput {
            attempts_left: self.attempts_left,
        })
    }

    /// Handle one PIN submission at `now`.
    ///
    /// A wrong PIN is an expected outcome, not an error; `Err` means the
    /// secure store itself failed, and no transition took place.
    pub fn submit_pin(&mut self, pin: &str, now: DateTime<Utc>) -> Result<PinOutcome, CoreError> {
        match self.state(now)? {
            UnlockState::Unlocked => return Ok(PinOutcome::Unlocked),
            // Precondition still holds: reject without consuming an attempt.
            UnlockState::Locked { until } => return Ok(PinOutcome::LockedOut { until }),
            UnlockState::RecoveryRequired => return Ok(PinOutcome::RecoveryRequired),
            UnlockState::AwaitingInput { .. } => {}
        }

        let stored = self.store.get_string(PIN_KEY)?.ok_or(CoreError::PinNotSet)?;

        if pin == stored {
            self.unlocked = true;
            self.attempts_left = MAX_ATTEMPTS;
            self.store.put_i64(LOCK_COUNT_KEY, 0)?;
            self.store.put_i64(UNLOCK_AT_KEY, 0)?;
            return Ok(PinOutcome::Unlocked);
        }

        self.attempts_left -= 1;
        if self.attempts_left > 0 {
            return Ok(PinOutcome::WrongPin {
                attempts_left: self.attempts_left,
            });
        }

        // Cycle exhausted: escalate.
        let lock_count = self.lock_count()? + 1;
        self.store.put_i64(LOCK_COUNT_KEY, lock_count)?;
        self.attempts_left = MAX_ATTEMPTS; // for after the lock expires

        if lock_count >= RECOVERY_THRESHOLD {
            return Ok(PinOutcome::RecoveryRequired);
        }

        let until = now + lock_duration(lock_count);
        self.store.put_i64(UNLOCK_AT_KEY, until.timestamp())?;
        Ok(PinOutcome::LockedOut { until })
    }

    /// Try the biometric fast path. Success unlocks directly; failure or
    /// error leaves every counter and persisted field untouched.
    pub async fn unlock_with_biometric(
        &mut self,
        authenticator: &dyn BiometricAuthenticator,
    ) -> Result<BiometricOutcome, CoreError> {
        let outcome = authenticator.authenticate().await;
        if outcome == BiometricOutcome::Success {
            self.unlocked = true;
        }
        Ok(outcome)
    }

    /// Whether this session has already been unlocked.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Attempts left in the current cycle (session state).
    #[must_use]
    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    /// Administrative escape hatch out of `RecoveryRequired`: clears the
    /// lockout counters without touching the PIN. A future coordinate-card
    /// recovery flow validates the card and then calls this. Nothing in
    /// the normal PIN path reaches it.
    pub fn reset_lockout(&mut self) -> Result<(), CoreError> {
        self.attempts_left = MAX_ATTEMPTS;
        self.store.put_i64(LOCK_COUNT_KEY, 0)?;
        self.store.put_i64(UNLOCK_AT_KEY, 0)?;
        Ok(())
    }

    /// Consume the machine, returning the underlying store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// The underlying `secure_prefs` store. The PIN setup flow writes
    /// through this — setup and unlock share one namespace.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn lock_count(&self) -> Result<i64, CoreError> {
        Ok(self.store.get_i64(LOCK_COUNT_KEY)?.unwrap_or(0))
    }

    fn lock_expiry(&self) -> Result<Option<DateTime<Utc>>, CoreError> {
        let unlock_at = self.store.get_i64(UNLOCK_AT_KEY)?.unwrap_or(0);
        if unlock_at <= 0 {
            return Ok(None);
        }
        let until = DateTime::<Utc>::from_timestamp(unlock_at, 0).ok_or_else(|| {
            CoreError::Deserialization(format!("stored unlock_at out of range: {unlock_at}"))
        })?;
        Ok(Some(until))
    }
}

/// Lock duration for the n-th exhausted cycle (1-based), clamped to the
/// last table entry for any overflow.
fn lock_duration(lock_count: i64) -> Duration {
    let idx = usize::try_from(lock_count - 1)
        .unwrap_or(0)
        .min(LOCK_DURATIONS_SECS.len() - 1);
    Duration::seconds(LOCK_DURATIONS_SECS[idx])
}
