//! Application-root discovery.
//!
//! Relative configuration paths resolve against the application root. When a
//! caller does not supply one, it is found in this order:
//!
//! 1. the `APP_ROOT_PATH` environment variable, when set and non-empty;
//! 2. the nearest ancestor of the working directory containing
//!    `package.json`;
//! 3. the working directory itself.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::accumulator::PACKAGE_DESCRIPTOR;
use crate::source::{canonicalise, normalise, resolve};
use crate::{StrataError, StrataResult};

/// Environment variable that overrides application-root discovery.
pub const APP_ROOT_ENV: &str = "APP_ROOT_PATH";

/// Determine the application root for the current process.
///
/// A relative `APP_ROOT_PATH` resolves against the working directory. The
/// returned path is absolute and lexically normalised.
///
/// # Errors
///
/// Returns [`StrataError::AppRoot`] when the working directory cannot be read
/// or is not valid UTF-8.
pub fn discover_app_root() -> StrataResult<Utf8PathBuf> {
    let cwd = current_dir().map_err(|err| std::sync::Arc::new(StrataError::AppRoot(err)))?;
    let root = match std::env::var(APP_ROOT_ENV) {
        Ok(value) if !value.is_empty() => {
            let from_env = resolve(&cwd, Utf8Path::new(&value));
            tracing::debug!(root = %from_env, "application root taken from {APP_ROOT_ENV}");
            from_env
        }
        _ => find_package_root(&cwd).map_or_else(
            || {
                tracing::debug!(%cwd, "no package descriptor found; using working directory");
                cwd.clone()
            },
            Utf8Path::to_path_buf,
        ),
    };
    Ok(root)
}

/// Make an explicitly supplied root absolute and lexically normalised.
///
/// Relative roots are anchored to the working directory once, so later
/// directory changes do not move cache keys or error paths.
pub(crate) fn absolute_root(root: &Utf8Path) -> StrataResult<Utf8PathBuf> {
    if root.is_absolute() {
        return Ok(normalise(root));
    }
    let cwd = current_dir().map_err(|err| std::sync::Arc::new(StrataError::AppRoot(err)))?;
    Ok(resolve(&cwd, root))
}

/// Returns the nearest directory at or above `start` that contains
/// `package.json`.
///
/// # Examples
///
/// ```rust,no_run
/// use camino::Utf8Path;
/// use strata_config::find_package_root;
///
/// if let Some(root) = find_package_root(Utf8Path::new("/srv/app/config")) {
///     println!("package root: {root}");
/// }
/// ```
#[must_use]
pub fn find_package_root(start: &Utf8Path) -> Option<&Utf8Path> {
    start
        .ancestors()
        .find(|dir| dir.join(PACKAGE_DESCRIPTOR).is_file())
}

fn current_dir() -> io::Result<Utf8PathBuf> {
    let raw = std::env::current_dir()?;
    let cwd = Utf8PathBuf::from_path_buf(raw).map_err(|path| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("working directory is not valid UTF-8: {}", path.display()),
        )
    })?;
    canonicalise(&cwd)
}
