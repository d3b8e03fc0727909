//! The source reader boundary and its filesystem implementation.

use std::sync::Arc;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Existence check and text read for configuration sources.
///
/// Paths handed to a reader are already resolved against the application
/// root.
pub trait SourceReader: Send + Sync {
    /// Returns `true` when a source exists at `path`.
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Read the full text of the source at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] when the source cannot be read or is not
    /// valid UTF-8 text.
    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String>;
}

impl<R: SourceReader + ?Sized> SourceReader for Arc<R> {
    fn exists(&self, path: &Utf8Path) -> bool {
        (**self).exists(path)
    }

    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String> {
        (**self).read_text(path)
    }
}

impl<R: SourceReader + ?Sized> SourceReader for Box<R> {
    fn exists(&self, path: &Utf8Path) -> bool {
        (**self).exists(path)
    }

    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String> {
        (**self).read_text(path)
    }
}

/// Reader that opens files through `cap-std` directory handles.
///
/// Each access opens the parent directory with ambient authority and then
/// operates on the file name inside it.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn exists(&self, path: &Utf8Path) -> bool {
        locate(path).is_ok_and(|(dir, name)| dir.exists(name))
    }

    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String> {
        let (dir, name) = locate(path)?;
        dir.read_to_string(name)
    }
}

/// Split `path` into an opened parent directory and the entry name inside
/// it. A bare file name is looked up in the working directory.
fn locate(path: &Utf8Path) -> std::io::Result<(Dir, &str)> {
    let Some(name) = path.file_name() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("`{path}` does not name a file"),
        ));
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Ok((Dir::open_ambient_dir(parent, ambient_authority())?, name))
}
