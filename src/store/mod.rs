//! Durable state owned by the engine: calibration offset and reading log.
//!
//! Both stores follow the same discipline: the in-memory value and the
//! durable record are kept consistent after every mutating operation, and
//! a persistence failure is reported to the caller instead of being
//! silently swallowed.

pub mod calibration;
pub mod log;

pub use calibration::CalibrationStore;
pub use log::{LogEntry, LogStore, LOG_CAPACITY};

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;

    use crate::app::ports::FileStore;
    use crate::error::StorageError;

    /// In-memory [`FileStore`] for unit tests, with an optional failure
    /// switch to exercise the degraded paths.
    #[derive(Default)]
    pub struct MemStore {
        pub files: HashMap<String, String>,
        pub fail_writes: bool,
    }

    impl FileStore for MemStore {
        fn read_to_string(&self, name: &str) -> Result<String, StorageError> {
            self.files.get(name).cloned().ok_or(StorageError::NotFound)
        }

        fn write_all(&mut self, name: &str, contents: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::WriteFailed);
            }
            self.files.insert(name.to_owned(), contents.to_owned());
            Ok(())
        }

        fn append_line(&mut self, name: &str, line: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::WriteFailed);
            }
            let file = self.files.entry(name.to_owned()).or_default();
            file.push_str(line);
            file.push('\n');
            Ok(())
        }

        fn remove(&mut self, name: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::RemoveFailed);
            }
            self.files.remove(name);
            Ok(())
        }

        fn exists(&self, name: &str) -> bool {
            self.files.contains_key(name)
        }
    }
}
