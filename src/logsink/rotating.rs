//! Size-rotating CSV sink
//!
//! Records land in one active CSV file (header `date,level,time,value`).
//! Once the active file exceeds the size threshold it is shifted to
//! `<name>.1`, existing backups shift up, and anything beyond the retention
//! count is deleted. Read-back walks the retained files oldest first.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use super::{LogRecord, LogSink, RecordRow};
use crate::error::Result;

/// Rotating append-only CSV store.
pub struct RotatingCsvSink {
    path: PathBuf,
    max_size: u64,
    max_files: usize,
    // Guards the rotate-then-append sequence. There is only one writer
    // context by design, but read_back may run from another.
    lock: Mutex<()>,
}

impl RotatingCsvSink {
    /// Opens (or creates) the sink at `path`.
    ///
    /// `max_size` is the rotation threshold in bytes for the active file;
    /// `max_files` the number of rotated files retained. Parent directories
    /// are created as needed and a header row is written to a fresh file.
    pub fn new(path: impl Into<PathBuf>, max_size: u64, max_files: usize) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let sink = Self { path, max_size, max_files, lock: Mutex::new(()) };
        sink.ensure_header()?;
        Ok(sink)
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_header(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        let file = File::create(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["date", "level", "time", "value"])?;
        writer.flush()?;
        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) -> Result<()> {
        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        };
        if size < self.max_size {
            return Ok(());
        }

        debug!(path = %self.path.display(), size, "rotating log file");
        if self.max_files == 0 {
            fs::remove_file(&self.path)?;
        } else {
            let oldest = self.backup_path(self.max_files);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.max_files).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }
        self.ensure_header()
    }

    fn read_file(path: &Path, records: &mut Vec<LogRecord>) -> Result<()> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        for row in reader.deserialize::<RecordRow>() {
            // Malformed or foreign rows are skipped rather than failing the
            // whole dump.
            let Ok(row) = row else { continue };
            if let Some(record) = row.into_record() {
                records.push(record);
            }
        }
        Ok(())
    }
}

impl LogSink for RotatingCsvSink {
    fn append(&self, record: &LogRecord) -> Result<()> {
        let _guard = self.lock.lock();
        self.rotate_if_needed()?;

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(RecordRow::from_record(record))?;
        writer.flush()?;
        Ok(())
    }

    fn read_back(&self) -> Result<Vec<LogRecord>> {
        let _guard = self.lock.lock();
        let mut records = Vec::new();
        for index in (1..=self.max_files).rev() {
            let backup = self.backup_path(index);
            if backup.exists() {
                Self::read_file(&backup, &mut records)?;
            }
        }
        if self.path.exists() {
            Self::read_file(&self.path, &mut records)?;
        }
        Ok(records)
    }
}
