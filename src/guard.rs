//! Per-file lockout after repeated failed unlock attempts.
//!
//! Each path moves through `Unlocked { failures }` to `Locked { since }`
//! once `max_attempts` failures accumulate. A locked path rejects every
//! attempt, correct password included, until the lock is lifted:
//!
//! - with no cooldown (the default) only [`AttemptGuard::reset`] or a new
//!   process lifts it;
//! - with a cooldown, [`AttemptGuard::check`] lifts it once the cooldown
//!   has elapsed since the lock was taken.
//!
//! State is in memory only and never persisted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::errors::{MacroVaultError, Result};

/// Default number of failed attempts before a path locks.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// When a path locks, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub cooldown: Option<Duration>,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AttemptState {
    Unlocked { failures: u32 },
    Locked { failures: u32, since: Instant },
}

impl AttemptState {
    fn failures(self) -> u32 {
        match self {
            Self::Unlocked { failures } | Self::Locked { failures, .. } => failures,
        }
    }
}

/// Counters are keyed by the canonical path when the file exists, so
/// `m1.gma.json`, `./m1.gma.json` and the absolute path share one counter.
fn state_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Failed-attempt counters keyed by file path.
///
/// Safe to share between threads (`Arc<AttemptGuard>`); each call takes
/// the internal lock once.
#[derive(Debug, Default)]
pub struct AttemptGuard {
    policy: LockoutPolicy,
    states: Mutex<HashMap<PathBuf, AttemptState>>,
}

impl AttemptGuard {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    /// Fail with `AttemptsExceeded` if `path` is locked.
    ///
    /// Call before every unlock attempt. An expired cooldown clears the
    /// path's state here.
    pub fn check(&self, path: &Path) -> Result<()> {
        let key = state_key(path);
        let mut states = self.states.lock();

        let Some(AttemptState::Locked { failures, since }) = states.get(&key).copied() else {
            return Ok(());
        };

        if let Some(cooldown) = self.policy.cooldown {
            if since.elapsed() >= cooldown {
                debug!(path = %path.display(), "lockout cooldown elapsed");
                states.remove(&key);
                return Ok(());
            }
        }

        Err(MacroVaultError::AttemptsExceeded {
            path: path.to_path_buf(),
            attempts: failures,
        })
    }

    /// Count one failed attempt and return the new failure total.
    ///
    /// Once locked the count stays at the value that triggered the lock.
    pub fn record_failure(&self, path: &Path) -> u32 {
        let key = state_key(path);
        let mut states = self.states.lock();
        let previous = states
            .get(&key)
            .copied()
            .unwrap_or(AttemptState::Unlocked { failures: 0 });

        if let AttemptState::Locked { failures, .. } = previous {
            return failures;
        }

        let failures = previous.failures().saturating_add(1);
        let next = if failures >= self.policy.max_attempts {
            warn!(path = %path.display(), failures, "macro file locked after failed attempts");
            AttemptState::Locked {
                failures,
                since: Instant::now(),
            }
        } else {
            AttemptState::Unlocked { failures }
        };

        states.insert(key, next);
        failures
    }

    /// Forget all failures for `path` after a successful unlock.
    pub fn record_success(&self, path: &Path) {
        self.states.lock().remove(&state_key(path));
    }

    /// Lift a lock explicitly, e.g. when the user starts a new session.
    pub fn reset(&self, path: &Path) {
        if self.states.lock().remove(&state_key(path)).is_some() {
            debug!(path = %path.display(), "attempt counter reset");
        }
    }

    /// Failed attempts recorded for `path`.
    pub fn failures(&self, path: &Path) -> u32 {
        self.states
            .lock()
            .get(&state_key(path))
            .map_or(0, |state| state.failures())
    }

    /// Attempts left before `path` locks (0 once locked).
    pub fn remaining(&self, path: &Path) -> u32 {
        self.policy.max_attempts.saturating_sub(self.failures(path))
    }

    /// Whether the next [`check`](Self::check) would fail.
    pub fn is_locked(&self, path: &Path) -> bool {
        match self.states.lock().get(&state_key(path)) {
            Some(AttemptState::Locked { since, .. }) => self
                .policy
                .cooldown
                .map_or(true, |cooldown| since.elapsed() < cooldown),
            _ => false,
        }
    }
}
