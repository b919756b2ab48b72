//! Capability-scoped file reads for startup inputs.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

/// Read `path` by opening its parent directory with ambient authority.
pub(crate) fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(Path::new(file_name))
}
