// Workspace cleanup
// Post-action helper that empties the working directory without removing
// the directory itself, so a subsequent run can reuse the same path.

use crate::{EngineError, EngineResult};
use std::fs;
use std::path::Path;

/// Remove every entry inside `dir`, keeping `dir` itself.
/// Refuses filesystem roots and paths that are not directories.
pub fn clean_workspace(dir: &Path) -> EngineResult<()> {
    if !dir.is_dir() || dir.parent().is_none() {
        return Err(EngineError::UnsafeWorkspace(dir.display().to_string()));
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}
