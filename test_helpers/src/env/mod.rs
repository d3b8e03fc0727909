//! Guarded mutation of environment variables in tests.
//!
//! Every mutation takes a process-wide re-entrant lock and returns an
//! [`EnvVarGuard`] that restores the previous value (or removes the variable)
//! when dropped. Guards for the same key stack and unwind in LIFO order.
//! Hold an [`EnvScope`] when a test needs the lock for its whole duration.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _root = env::set_var("APP_ROOT_PATH", "/srv/app");
//! assert_eq!(std::env::var("APP_ROOT_PATH").as_deref(), Ok("/srv/app"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores an environment variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held for the duration of the write.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held for the duration of the write.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Holds the environment lock; mutations made through it do not re-lock.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Sets `key` to `value` while the lock is held.
    pub fn set_var(&self, key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
        let name = key.into();
        let original = env::var_os(&name);
        // SAFETY: the lock held by `self` serialises environment writes.
        unsafe { env::set_var(&name, value) };
        EnvVarGuard {
            key: name,
            original,
        }
    }

    /// Removes `key` while the lock is held.
    pub fn remove_var(&self, key: impl Into<String>) -> EnvVarGuard {
        let name = key.into();
        let original = env::var_os(&name);
        // SAFETY: the lock held by `self` serialises environment writes.
        unsafe { env::remove_var(&name) };
        EnvVarGuard {
            key: name,
            original,
        }
    }
}

/// Holds the environment lock together with the guards created under it.
///
/// Guards are restored before the lock is released.
///
/// # Examples
///
/// ```
/// use test_helpers::env::EnvScope;
///
/// let _scope = EnvScope::new_with(|lock| vec![lock.remove_var("APP_ROOT_PATH")]);
/// assert!(std::env::var("APP_ROOT_PATH").is_err());
/// ```
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: EnvVarLock,
}

impl EnvScope {
    /// Take the lock, then run `builder` to create the scoped guards.
    pub fn new_with<F>(builder: F) -> Self
    where
        F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
    {
        let lock = lock();
        let guards = builder(&lock);
        Self {
            guards,
            _lock: lock,
        }
    }

    /// Number of guards held by the scope.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.guards.len()
    }

    /// Returns `true` when the scope only holds the lock.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Sets `key` to `value` and returns a guard restoring the prior state.
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    lock().set_var(key, value)
}

/// Removes `key` and returns a guard restoring the prior state.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    lock().remove_var(key)
}

/// Acquire the environment lock for the lifetime of the returned value.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}
