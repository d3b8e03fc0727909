//! Snapshot writers for `strata`.

use std::io::Write;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use serde_json::Value;

use crate::error::CliError;

/// Render the snapshot as JSON text with a trailing newline.
///
/// # Errors
///
/// Returns [`CliError::Json`] when serialisation fails.
pub fn render(snapshot: &Value, is_compact: bool) -> Result<String, CliError> {
    let mut text = if is_compact {
        serde_json::to_string(snapshot)?
    } else {
        serde_json::to_string_pretty(snapshot)?
    };
    text.push('\n');
    Ok(text)
}

/// Write rendered output to standard output.
///
/// # Errors
///
/// Returns [`CliError::Io`] when standard output is closed.
pub fn write_stdout(content: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| CliError::Io {
            path: Utf8Path::new("<stdout>").to_path_buf(),
            source,
        })
}

/// Write rendered output to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the parent directory cannot be opened or the
/// file cannot be written.
pub fn write_file(path: &Utf8Path, content: &str) -> Result<(), CliError> {
    let io_err = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let name = path.file_name().ok_or_else(|| {
        io_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output path has no file name",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_err)?;
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)
}
