use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("failed to walk static directory")]
    Walk(#[from] walkdir::Error),
    #[error("failed to copy {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Replicate the tree under `src` into `dst`, keeping permission bits.
///
/// Stops at the first file that cannot be copied. Returns the number of
/// files copied.
pub fn copy_dir<S: AsRef<Path>, D: AsRef<Path>>(src: S, dst: D) -> Result<usize, CopyError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let mut copied = 0;
    let mut dirs: Vec<(PathBuf, Permissions)> = Vec::new();

    for entry in WalkDir::new(src) {
        let entry = entry?;
        // Every entry lives under src
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| CopyError::Io {
                path: target.clone(),
                source,
            })?;
            if entry.depth() > 0 {
                dirs.push((target, entry.metadata()?.permissions()));
            }
        } else {
            // fs::copy carries the permission bits over
            fs::copy(entry.path(), &target).map_err(|source| CopyError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            debug!("Copied {} -> {}", entry.path().display(), target.display());
            copied += 1;
        }
    }

    // Deepest first, so a read-only parent can't block its children
    for (dir, permissions) in dirs.into_iter().rev() {
        fs::set_permissions(&dir, permissions).map_err(|source| CopyError::Io { path: dir, source })?;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_nested_tree_byte_for_byte() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("css/vendor")).unwrap();
        fs::write(src.path().join("css/site.css"), "body { margin: 0 }").unwrap();
        fs::write(src.path().join("css/vendor/reset.css"), "*{}").unwrap();
        fs::write(src.path().join("logo.bin"), [0u8, 159, 146, 150]).unwrap();
        fs::create_dir(src.path().join("empty")).unwrap();

        let copied = copy_dir(src.path(), dst.path()).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(
            fs::read(dst.path().join("css/site.css")).unwrap(),
            b"body { margin: 0 }"
        );
        assert_eq!(fs::read(dst.path().join("css/vendor/reset.css")).unwrap(), b"*{}");
        assert_eq!(fs::read(dst.path().join("logo.bin")).unwrap(), [0u8, 159, 146, 150]);
        assert!(dst.path().join("empty").is_dir());
    }

    #[test]
    fn missing_source_fails() {
        let dst = TempDir::new().unwrap();
        let err = copy_dir(dst.path().join("nope"), dst.path()).unwrap_err();
        assert!(matches!(err, CopyError::Walk(_)));
    }

    #[cfg(unix)]
    #[test]
    fn keeps_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let script = src.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, Permissions::from_mode(0o755)).unwrap();
        fs::create_dir(src.path().join("private")).unwrap();
        fs::set_permissions(src.path().join("private"), Permissions::from_mode(0o700)).unwrap();

        copy_dir(src.path(), dst.path()).unwrap();

        let mode = |p: PathBuf| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(dst.path().join("run.sh")), 0o755);
        assert_eq!(mode(dst.path().join("private")), 0o700);
    }
}
