//! Template file discovery

use super::{DocumentKind, TemplateResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix Office uses for owner/lock files next to an open document
pub const LOCK_FILE_PREFIX: &str = "~$";

/// List the template files of one kind directly inside `directory`
///
/// The listing is not recursive and is sorted by path. Symlinks to files are
/// included. With `skip_lock_files`, Office lock files (`~$Name.docx`) are left out.
pub fn list_template_files(
    directory: &Path,
    kind: DocumentKind,
    skip_lock_files: bool,
) -> TemplateResult<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        // Follows symlinks, so linked templates are listed too
        if !path.is_file() {
            continue;
        }

        let matches_kind = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DocumentKind::from_extension)
            == Some(kind);
        if !matches_kind {
            continue;
        }

        let is_lock_file = entry.file_name().to_string_lossy().starts_with(LOCK_FILE_PREFIX);
        if skip_lock_files && is_lock_file {
            tracing::debug!("Skipping lock file {}", path.display());
            continue;
        }

        paths.push(path);
    }

    paths.sort();
    Ok(paths)
}
