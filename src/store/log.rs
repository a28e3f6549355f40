//! Fixed-capacity, time-ordered reading log with a durable CSV mirror.
//!
//! The in-memory sequence is a `heapless::Vec` of at most [`LOG_CAPACITY`]
//! entries, oldest at index 0. Growth uses the append-only fast path on
//! the durable record; eviction and deletion rewrite it in full, which is
//! bounded by the small fixed capacity and therefore a small constant
//! stall on the control loop.

use core::fmt::Write as _;

use log::warn;
use serde::Serialize;

use crate::app::ports::{Clock, FileStore};
use crate::error::{LogError, StorageError};
use crate::telemetry::EnvReading;

/// Durable record name inside the data partition.
pub const LOG_FILE: &str = "logs.csv";

/// Fixed log capacity. On overflow the oldest entry is evicted.
pub const LOG_CAPACITY: usize = 32;

/// One logged reading. Immutable once appended — edits happen only by
/// removal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogEntry {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
    /// Seconds since boot at capture time.
    pub age_secs: u32,
}

impl LogEntry {
    /// Build an entry from a corrected reading and the clock port.
    pub fn capture(reading: &EnvReading, clock: &impl Clock) -> Self {
        Self {
            temperature: reading.temperature,
            humidity: reading.humidity,
            pressure: reading.pressure,
            age_secs: clock.uptime_secs(),
        }
    }

    /// One CSV line: `temperature,humidity,pressure,age_secs`,
    /// one-decimal numeric formatting. No trailing newline.
    fn to_line(self) -> heapless::String<64> {
        let mut line = heapless::String::new();
        // 64 bytes always fit four formatted fields; the write cannot fail.
        let _ = write!(
            line,
            "{:.1},{:.1},{:.1},{}",
            self.temperature, self.humidity, self.pressure, self.age_secs
        );
        line
    }

    /// Parse one CSV line. `None` for anything malformed.
    fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.trim().split(',');
        let temperature: f32 = fields.next()?.trim().parse().ok()?;
        let humidity: f32 = fields.next()?.trim().parse().ok()?;
        let pressure: f32 = fields.next()?.trim().parse().ok()?;
        let age_secs: u32 = fields.next()?.trim().parse().ok()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            temperature,
            humidity,
            pressure,
            age_secs,
        })
    }
}

/// Owner of the ordered log sequence and its durable mirror.
#[derive(Debug, Default)]
pub struct LogStore {
    entries: heapless::Vec<LogEntry, LOG_CAPACITY>,
}

impl LogStore {
    pub const fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest-first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The most recent entry, if any. Used by the engine's dedup check.
    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Restore the sequence from the durable record.
    ///
    /// Malformed lines are skipped, not fatal. Parsing stops once
    /// capacity is reached; excess historical lines are silently
    /// discarded. A missing record simply means "no logs".
    pub fn load(&mut self, fs: &impl FileStore) {
        self.entries.clear();
        let contents = match fs.read_to_string(LOG_FILE) {
            Ok(c) => c,
            Err(StorageError::NotFound) => return,
            Err(e) => {
                warn!("log: load failed ({e}), starting empty");
                return;
            }
        };
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some(entry) = LogEntry::parse_line(line) else {
                warn!("log: skipping malformed line");
                continue;
            };
            if self.entries.push(entry).is_err() {
                break;
            }
        }
    }

    /// Append an entry, evicting the oldest first when full.
    ///
    /// Under capacity the durable record grows by one appended line; once
    /// an eviction happens an append-only format cannot drop the oldest
    /// line, so the record is rewritten in full. On a storage error the
    /// in-memory sequence has still mutated and the caller must treat it
    /// as best-effort until the next successful rewrite.
    pub fn append(
        &mut self,
        entry: LogEntry,
        fs: &mut impl FileStore,
    ) -> Result<(), StorageError> {
        if self.entries.is_full() {
            self.entries.remove(0);
            // push cannot fail after the remove above.
            let _ = self.entries.push(entry);
            self.rewrite(fs)
        } else {
            let _ = self.entries.push(entry);
            fs.append_line(LOG_FILE, &entry.to_line())
        }
    }

    /// Remove the entry at `index`, shifting later entries left.
    ///
    /// An out-of-range index is rejected with no state change. When the
    /// last entry goes, the durable record is deleted rather than
    /// rewritten as empty.
    pub fn delete_at(&mut self, index: usize, fs: &mut impl FileStore) -> Result<(), LogError> {
        if index >= self.entries.len() {
            return Err(LogError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.entries.remove(index);
        if self.entries.is_empty() {
            fs.remove(LOG_FILE)?;
        } else {
            self.rewrite(fs)?;
        }
        Ok(())
    }

    /// Empty the sequence and delete the durable record.
    pub fn clear(&mut self, fs: &mut impl FileStore) -> Result<(), StorageError> {
        self.entries.clear();
        fs.remove(LOG_FILE)
    }

    fn rewrite(&self, fs: &mut impl FileStore) -> Result<(), StorageError> {
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&entry.to_line());
            contents.push('\n');
        }
        fs.write_all(LOG_FILE, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::MemStore;

    struct FixedClock(u32);
    impl Clock for FixedClock {
        fn uptime_secs(&self) -> u32 {
            self.0
        }
    }

    fn entry(t: f32, age: u32) -> LogEntry {
        LogEntry {
            temperature: t,
            humidity: 50.0,
            pressure: 1000.0,
            age_secs: age,
        }
    }

    #[test]
    fn capture_stamps_uptime() {
        let e = LogEntry::capture(&EnvReading::new(21.0, 50.0, 1000.0), &FixedClock(340));
        assert_eq!(e.age_secs, 340);
    }

    #[test]
    fn append_grows_file_line_by_line() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        store.append(entry(20.0, 1), &mut fs).unwrap();
        store.append(entry(21.0, 2), &mut fs).unwrap();
        assert_eq!(fs.files[LOG_FILE], "20.0,50.0,1000.0,1\n21.0,50.0,1000.0,2\n");
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        for i in 0..=LOG_CAPACITY as u32 {
            store.append(entry(10.0 + i as f32, i), &mut fs).unwrap();
        }
        assert_eq!(store.len(), LOG_CAPACITY);
        // Entry 0 of the original set is gone; the newest 32 remain.
        assert_eq!(store.entries()[0].age_secs, 1);
        assert_eq!(store.newest().unwrap().age_secs, LOG_CAPACITY as u32);
        // The durable record was rewritten to match.
        assert_eq!(fs.files[LOG_FILE].lines().count(), LOG_CAPACITY);
        assert!(fs.files[LOG_FILE].starts_with("11.0,"));
    }

    #[test]
    fn load_round_trips_after_restart() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        for i in 0..5u32 {
            store.append(entry(20.0 + i as f32, i * 10), &mut fs).unwrap();
        }

        let mut restarted = LogStore::new();
        restarted.load(&fs);
        assert_eq!(restarted.entries(), store.entries());
    }

    #[test]
    fn load_skips_malformed_lines() {
        let mut fs = MemStore::default();
        fs.files.insert(
            LOG_FILE.to_owned(),
            "20.0,50.0,1000.0,1\ngarbage\n21.0,50.0,1000.0,2\n".to_owned(),
        );
        let mut store = LogStore::new();
        store.load(&fs);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn load_stops_at_capacity() {
        let mut fs = MemStore::default();
        let mut contents = String::new();
        for i in 0..(LOG_CAPACITY + 10) {
            contents.push_str(&format!("20.0,50.0,1000.0,{i}\n"));
        }
        fs.files.insert(LOG_FILE.to_owned(), contents);
        let mut store = LogStore::new();
        store.load(&fs);
        assert_eq!(store.len(), LOG_CAPACITY);
    }

    #[test]
    fn delete_out_of_range_rejected() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        store.append(entry(20.0, 1), &mut fs).unwrap();
        let err = store.delete_at(1, &mut fs).unwrap_err();
        assert_eq!(err, LogError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_middle_shifts_left_and_rewrites() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        for i in 0..3u32 {
            store.append(entry(20.0 + i as f32, i), &mut fs).unwrap();
        }
        store.delete_at(1, &mut fs).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[1].age_secs, 2);
        assert_eq!(fs.files[LOG_FILE], "20.0,50.0,1000.0,0\n22.0,50.0,1000.0,2\n");
    }

    #[test]
    fn deleting_last_entry_removes_record() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        store.append(entry(20.0, 1), &mut fs).unwrap();
        store.delete_at(0, &mut fs).unwrap();
        assert!(store.is_empty());
        assert!(!fs.exists(LOG_FILE));

        let mut restarted = LogStore::new();
        restarted.load(&fs);
        assert!(restarted.is_empty());
    }

    #[test]
    fn clear_empties_memory_and_record() {
        let mut fs = MemStore::default();
        let mut store = LogStore::new();
        for i in 0..4u32 {
            store.append(entry(20.0 + i as f32, i), &mut fs).unwrap();
        }
        store.clear(&mut fs).unwrap();
        assert!(store.is_empty());
        assert!(!fs.exists(LOG_FILE));
    }

    #[test]
    fn append_reports_failed_write_but_keeps_memory() {
        let mut fs = MemStore {
            fail_writes: true,
            ..MemStore::default()
        };
        let mut store = LogStore::new();
        assert!(store.append(entry(20.0, 1), &mut fs).is_err());
        // Best-effort: the in-memory entry is present, durability is not.
        assert_eq!(store.len(), 1);
    }
}
