use crate::error::SummaryError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the transaction files directly inside `dir` whose extension is one
/// of `extensions` (case-insensitive), in lexicographic path order.
///
/// # Errors
/// Returns error if the directory cannot be read.
pub fn discover_transaction_files(
    dir: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, SummaryError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| SummaryError::Discovery {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}
