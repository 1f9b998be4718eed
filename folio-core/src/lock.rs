use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive claim on an output directory for the length of one build.
///
/// Backed by an OS file lock on `<output_dir>.lock`, a sibling of the output
/// directory so it survives the output being wiped. The lock is released
/// when this value is dropped or the process exits; the file itself stays.
#[derive(Debug)]
pub struct BuildLock {
    path: PathBuf,
    _file: File,
}

impl BuildLock {
    pub fn path_for(output_dir: &Path) -> PathBuf {
        let mut name = output_dir
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("output"));
        name.push(".lock");
        output_dir.with_file_name(name)
    }

    /// Fails with `WouldBlock` while another build holds the lock.
    pub fn acquire(output_dir: &Path) -> io::Result<Self> {
        let path = Self::path_for(output_dir);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        debug!("Acquiring build lock {}", path.display());

        let mut file = File::create(&path)?;
        file.try_lock_exclusive()?;

        // PID for whoever finds the lock held
        writeln!(file, "{}", std::process::id())?;

        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
