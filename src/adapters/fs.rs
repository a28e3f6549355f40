//! Filesystem adapter.
//!
//! Implements [`FileStore`] over `std::fs` inside a base directory:
//! the mounted SPIFFS data partition on the target, any plain
//! directory (typically a tempdir) on the host.
//!
//! Rewrites go through a temp file + rename so a power loss mid-write
//! leaves either the old record or the new one, never a torn mix.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::ports::FileStore;
use crate::error::StorageError;

pub struct FsStore {
    base: PathBuf,
}

impl FsStore {
    /// `base` must be an existing, writable directory (e.g. `/spiffs`).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }
}

impl FileStore for FsStore {
    fn read_to_string(&self, name: &str) -> Result<String, StorageError> {
        match fs::read_to_string(self.path(name)) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => {
                warn!("fs: read {name} failed: {e}");
                Err(StorageError::ReadFailed)
            }
        }
    }

    fn write_all(&mut self, name: &str, contents: &str) -> Result<(), StorageError> {
        let tmp = self.path(&format!("{name}.tmp"));
        let write = |tmp: &Path| -> std::io::Result<()> {
            let mut f = fs::File::create(tmp)?;
            f.write_all(contents.as_bytes())?;
            f.sync_all()?;
            fs::rename(tmp, self.path(name))
        };
        write(&tmp).map_err(|e| {
            warn!("fs: rewrite {name} failed: {e}");
            let _ = fs::remove_file(&tmp);
            StorageError::WriteFailed
        })
    }

    fn append_line(&mut self, name: &str, line: &str) -> Result<(), StorageError> {
        let append = || -> std::io::Result<()> {
            let mut f = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.path(name))?;
            writeln!(f, "{line}")?;
            f.sync_all()
        };
        append().map_err(|e| {
            warn!("fs: append {name} failed: {e}");
            StorageError::WriteFailed
        })
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!("fs: remove {name} failed: {e}");
                Err(StorageError::RemoveFailed)
            }
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsStore::new(dir.path());
        store.write_all("offset.txt", "1.50\n").unwrap();
        assert_eq!(store.read_to_string("offset.txt").unwrap(), "1.50\n");
    }

    #[test]
    fn append_creates_then_grows() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsStore::new(dir.path());
        store.append_line("logs.csv", "a").unwrap();
        store.append_line("logs.csv", "b").unwrap();
        assert_eq!(store.read_to_string("logs.csv").unwrap(), "a\nb\n");
    }

    #[test]
    fn missing_record_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert_eq!(
            store.read_to_string("nope.txt").unwrap_err(),
            StorageError::NotFound
        );
        assert!(!store.exists("nope.txt"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsStore::new(dir.path());
        store.write_all("logs.csv", "x\n").unwrap();
        store.remove("logs.csv").unwrap();
        store.remove("logs.csv").unwrap();
        assert!(!store.exists("logs.csv"));
    }

    #[test]
    fn rewrite_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsStore::new(dir.path());
        store.append_line("logs.csv", "old").unwrap();
        store.write_all("logs.csv", "new\n").unwrap();
        assert_eq!(store.read_to_string("logs.csv").unwrap(), "new\n");
    }
}
