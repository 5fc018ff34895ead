//! Creates the override root's `theme-components/` directory on demand.

use crate::layout::components_dir;
use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Make sure `<override_root>/theme-components` exists and return its path.
///
/// Only the final directory is created; a missing override root is reported
/// as an error rather than silently built. Creation is attempted once.
pub fn ensure_components_directory(override_root: &Path) -> Result<PathBuf> {
    let dir = components_dir(override_root);
    if dir.is_dir() {
        return Ok(dir);
    }
    match fs::create_dir(&dir) {
        Ok(()) => {
            info!(path = %dir.display(), "created components directory");
            Ok(dir)
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(dir),
        Err(err) => Err(anyhow::Error::new(err)
            .context(format!("creating components directory {}", dir.display()))),
    }
}
