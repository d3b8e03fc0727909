//! Building package layouts inside a `figment::Jail`.
//!
//! A jail gives each test a fresh temporary working directory and restores
//! any environment variables set through it. Strata tests lay out
//! `package.json` trees there for application-root discovery and file
//! loading, then compare discovered paths against [`jail_root`].

use anyhow::anyhow;
use camino::{Utf8Path, Utf8PathBuf};
use figment::Jail;

/// Outcome of a jailed test body.
pub type JailResult<T> = figment::error::Result<T>;

/// Runs `body` in a fresh [`Jail`] and hands back what it produced.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or `body` fails.
pub fn with_jail<T>(body: impl FnOnce(&mut Jail) -> JailResult<T>) -> anyhow::Result<T> {
    let mut produced = None;
    Jail::try_with(|jail| body(jail).map(|value| produced = Some(value)))
        .map_err(|err| anyhow!("jailed test failed: {err}"))?;
    produced.ok_or_else(|| anyhow!("jailed test produced no value"))
}

/// Returns the jail's working directory as a UTF-8 path.
///
/// The path is not canonicalised; callers comparing it with discovered roots
/// should resolve symlinks themselves.
///
/// # Errors
///
/// Returns an error if the directory is not valid UTF-8.
pub fn jail_root(jail: &Jail) -> JailResult<Utf8PathBuf> {
    Utf8Path::from_path(jail.directory())
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| figment_error("jail directory is not valid UTF-8"))
}

/// Adapts any displayable failure into a [`figment::Error`] so it can leave a
/// jailed body through `?` or `map_err`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "`map_err` hands over owned errors"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    err.to_string().into()
}
