//! Path resolution against the application root.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Resolve `path` against `root` and normalise it lexically.
///
/// Absolute paths are kept as they are; relative ones are joined onto
/// `root`. `.` components are dropped and `..` removes the preceding normal
/// component, so differently spelled references to the same file produce the
/// same key. The filesystem is never consulted, so missing files resolve
/// too.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8Path;
/// use strata_config::resolve;
///
/// let root = Utf8Path::new("/srv/app");
/// assert_eq!(resolve(root, Utf8Path::new("config/../local.json")), "/srv/app/local.json");
/// assert_eq!(resolve(root, Utf8Path::new("/etc/app.yaml")), "/etc/app.yaml");
/// ```
#[must_use]
pub fn resolve(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        normalise(path)
    } else {
        normalise(&root.join(path))
    }
}

pub(crate) fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                Some(Utf8Component::ParentDir | Utf8Component::CurDir) | None => {
                    parts.push(component);
                }
            },
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::Normal(_) => {
                parts.push(component);
            }
        }
    }
    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Canonicalise `p` using platform-specific rules.
///
/// Returns an absolute, normalised path with symlinks resolved. On Windows
/// the `dunce` crate is used to avoid introducing UNC prefixes in diagnostic
/// messages.
///
/// # Errors
///
/// Returns an [`std::io::Error`] if canonicalisation fails or the result is
/// not valid UTF-8.
pub fn canonicalise(p: &Utf8Path) -> std::io::Result<Utf8PathBuf> {
    #[cfg(windows)]
    let canonical = dunce::canonicalize(p)?;
    #[cfg(not(windows))]
    let canonical = std::fs::canonicalize(p)?;
    Utf8PathBuf::from_path_buf(canonical).map_err(|non_utf8| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("path is not valid UTF-8: {}", non_utf8.display()),
        )
    })
}
