use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl From<&Path> for Destination {
    fn from(path: &Path) -> Self {
        if path == Path::new("-") {
            Destination::Stdout
        } else {
            Destination::File(path.to_owned())
        }
    }
}

impl Destination {
    pub fn write(&self, contents: &str) -> Result<()> {
        match self {
            Destination::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(contents.as_bytes())?;
                handle.flush()?;
                Ok(())
            }
            Destination::File(path) => write_atomic(path, contents),
        }
    }
}

/// Writes `contents` to a temporary file next to `path` and renames it into
/// place. The target is either fully written or left untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;

    // Temp files are created owner-only; keep the target's mode instead.
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }

    file.as_file().sync_all()?;
    file.persist(path)?;

    log::info!("Wrote {} bytes to {}", contents.len(), path.display());

    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
