use std::path::{Path, PathBuf};
use tracing::debug;

/// Content files directly inside `content_dir`, in file name order.
///
/// Subdirectories are ignored and only the exact `md` extension counts.
pub fn scan_content<P: AsRef<Path>>(content_dir: P) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(content_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }

        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            debug!("Discovered {}", path.display());
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
