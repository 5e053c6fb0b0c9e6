//! Rotating file writer with size-based rotation and backup retention.
//!
//! This module provides a thread-safe log file writer that rotates the file
//! when it exceeds a size threshold and keeps a fixed number of backups, so
//! a menu left running on a device never fills its storage.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// Before each write the current file size is checked. Once it is over the
/// limit, the file is renamed with a timestamp suffix and a fresh file is
/// started. Backups beyond the retention count are removed, oldest first.
///
/// The writer plugs into `tracing-subscriber` as a [`MakeWriter`]; each
/// formatted event arrives as a single write.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > limit, rotate:
///    - Rename current file to `<name>.<timestamp>`
///    - Open a new empty file
///    - Remove backups beyond the retention count
///
/// # Example
///
/// ```rust
/// use lcdmenu::observability::FileWriter;
/// use std::io::Write;
///
/// let dir = tempfile::tempdir().unwrap();
/// let writer = FileWriter::new(dir.path().join("menu.log"));
/// (&writer).write_all(b"started\n").unwrap();
/// ```
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened lazily on the first write.
    file: Mutex<Option<File>>,
}

impl FileWriter {
    /// Creates a writer for `file_path` with the default limits.
    ///
    /// The file is not opened until the first write, so construction
    /// succeeds even when the directory does not exist yet.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub fn with_limits(file_path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path: file_path.into(),
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock()?;
        self.check_and_rotate(&mut file)?;

        if file.is_none() {
            if let Some(parent) = self.file_path.parent() {
                fs::create_dir_all(parent)?;
            }
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
        }

        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        handle.write_all(buf)?;
        Ok(buf.len())
    }

    fn check_and_rotate(&self, file: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *file = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Moves the current file aside as `<name>.<timestamp>`.
    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.9f");
        let stem = format!("{}.{timestamp}", self.file_path.display());
        let mut backup_path = PathBuf::from(&stem);
        let mut attempt = 1;
        while backup_path.exists() {
            backup_path = PathBuf::from(format!("{stem}-{attempt}"));
            attempt += 1;
        }

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Deletes backups beyond the retention count. Timestamps sort
    /// lexically, so the newest backups come last by name.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let backups = self.backups()?;
        let excess = backups.len().saturating_sub(self.max_backups);
        for old_backup in &backups[..excess] {
            let _ = fs::remove_file(old_backup);
        }
        Ok(())
    }

    /// Existing backup files, oldest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let parent_dir = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = self
            .file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{name}."))
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();
        backups.sort();
        Ok(backups)
    }
}

impl Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock()?.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = &'a FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}
