//! Moving the process working directory for discovery tests.
//!
//! Application-root discovery starts from the working directory, which is
//! shared by every test in the process. [`enter`] switches it while holding a
//! process-wide lock and hands back a [`WorkingDir`] that switches back when
//! dropped.
//!
//! # Examples
//!
//! ```no_run
//! use test_helpers::cwd;
//!
//! let dir = cwd::enter("/srv/app/config").expect("enter directory");
//! assert!(dir.previous().is_absolute());
//! dir.leave().expect("return to the previous directory");
//! ```

use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::{Mutex, MutexGuard};

static LOCK: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// A working directory entered by [`enter`].
#[must_use = "the previous directory is restored when this value is dropped"]
pub struct WorkingDir {
    previous: Utf8PathBuf,
    is_restored: bool,
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDir {
    /// Directory that was current before [`enter`] ran.
    #[must_use]
    pub fn previous(&self) -> &Utf8Path {
        &self.previous
    }

    /// Return to the previous directory and release the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the previous directory can no longer be entered.
    pub fn leave(mut self) -> Result<()> {
        self.is_restored = true;
        std::env::set_current_dir(&self.previous)
            .with_context(|| format!("return to {}", self.previous))
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if !self.is_restored {
            // Failures surface through `leave`.
            let _ignored = std::env::set_current_dir(&self.previous);
        }
    }
}

/// Make `path` the working directory until the returned guard is dropped.
///
/// The previous directory is read before anything changes, so a non-UTF-8
/// working directory is reported without moving the process.
///
/// # Errors
///
/// Returns an error if the working directory is unreadable or not UTF-8, or
/// if `path` cannot be entered.
pub fn enter(path: impl AsRef<Utf8Path>) -> Result<WorkingDir> {
    let lock = LOCK.lock();
    let current = std::env::current_dir().context("read working directory")?;
    let previous = Utf8PathBuf::from_path_buf(current)
        .map_err(|raw| anyhow!("working directory is not UTF-8: {}", raw.display()))?;
    let target = path.as_ref();
    std::env::set_current_dir(target).with_context(|| format!("enter {target}"))?;
    Ok(WorkingDir {
        previous,
        is_restored: false,
        _lock: lock,
    })
}
