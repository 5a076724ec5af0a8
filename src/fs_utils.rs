//! Capability-scoped file helpers shared by file-backed adapters.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

pub(crate) fn open_ambient_dir(path: &Utf8Path) -> io::Result<Dir> {
    Dir::open_ambient_dir(path, ambient_authority())
}

pub(crate) fn open_parent_dir(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path must include a file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = open_ambient_dir(parent)?;
    Ok((dir, file_name))
}

pub(crate) fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, file_name) = open_parent_dir(path)?;
    dir.read_to_string(file_name)
}

/// Reads a file, treating a missing file as `None`.
pub(crate) fn read_optional(path: &Utf8Path) -> io::Result<Option<String>> {
    match read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replaces a file's contents through a sibling temporary file, so readers
/// see either the old or the new contents.
pub(crate) fn write(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let (dir, file_name) = open_parent_dir(path)?;
    let staging = format!(".{file_name}.tmp");
    dir.write(&staging, contents)?;
    dir.rename(&staging, &dir, file_name)
}
