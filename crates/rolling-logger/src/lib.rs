//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes every formatted line to stderr
//! and to `{log_dir}/{app}.{YYYY-MM-DD}.log`, starting a new file when the
//! local date changes.
//!
//! Records emitted through the `log` facade are bridged into the same
//! subscriber.

use chrono::{Local, NaiveDate};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use thiserror::Error;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
}

struct Current {
    date: NaiveDate,
    file: File,
}

struct Inner {
    dir: PathBuf,
    app_name: String,
    current: Option<Current>,
}

/// Log file named after the date of each write
#[derive(Clone)]
struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    fn new(dir: impl Into<PathBuf>, app_name: &str) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir,
                app_name: app_name.to_string(),
                current: None,
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `buf` to the file for `date`, rolling if the date changed
    fn write_at(&self, date: NaiveDate, buf: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();
        let needs_roll = inner.current.as_ref().map_or(true, |c| c.date != date);
        if needs_roll {
            let path = log_file_path(&inner.dir, &inner.app_name, date);
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            inner.current = Some(Current { date, file });
        }
        if let Some(current) = inner.current.as_mut() {
            current.file.write_all(buf)?;
        }
        Ok(())
    }
}

fn log_file_path(dir: &Path, app_name: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}.log", app_name, date.format("%Y-%m-%d")))
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at(Local::now().date_naive(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(current) = self.lock().current.as_mut() {
            current.file.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber. Level comes from `RUST_LOG`, default `info`.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let writer = RollingWriter::new(log_dir.as_ref(), app_name)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer.clone().and(io::stderr))
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    LOGGER
        .set(writer)
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::debug!(app = app_name, dir = %log_dir.as_ref().display(), "logger initialized");
    Ok(())
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::error!("{}", message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_rolls_to_new_file_on_date_change() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "tasklist").unwrap();

        writer.write_at(date(1), b"first\n").unwrap();
        writer.write_at(date(2), b"second\n").unwrap();

        let day1 = std::fs::read_to_string(dir.path().join("tasklist.2024-05-01.log")).unwrap();
        let day2 = std::fs::read_to_string(log_file_path(dir.path(), "tasklist", date(2))).unwrap();
        assert_eq!(day1, "first\n");
        assert_eq!(day2, "second\n");
    }

    #[test]
    fn test_appends_within_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "tasklist").unwrap();

        writer.write_at(date(1), b"one\n").unwrap();
        writer.write_at(date(1), b"two\n").unwrap();

        let day1 = std::fs::read_to_string(log_file_path(dir.path(), "tasklist", date(1))).unwrap();
        assert_eq!(day1, "one\ntwo\n");
    }

    #[test]
    fn test_helpers_require_init() {
        if LOGGER.get().is_none() {
            assert!(matches!(info("hello"), Err(LoggerError::NotInitialized)));
            assert!(matches!(error("boom"), Err(LoggerError::NotInitialized)));
        }
    }
}
