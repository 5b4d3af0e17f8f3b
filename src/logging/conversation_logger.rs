// Per-model conversation log
//
// Each model gets its own `output-<model>.csv` in the log directory. Rows are
// (timestamp, prompt, response) with no header. Files are only ever appended
// to or truncated as a whole.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Timestamp layout used in the log files (local time, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FILE_PREFIX: &str = "output-";
const FILE_EXTENSION: &str = "csv";

/// Failure reading or writing a model's log file
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("'{0}' cannot be used as a log file name")]
    InvalidModelName(String),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{action} {}: {source}", path.display())]
    Csv {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed entry in {} at record {record}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        record: usize,
        reason: String,
    },
}

/// A single logged exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// When the response came back (local time)
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,

    /// Prompt exactly as submitted
    pub prompt: String,

    /// Text returned by the model
    pub response: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn now(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            // Truncate so entries compare equal after a round trip through the file
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            prompt: prompt.into(),
            response: response.into(),
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    fn from_record(record: &csv::StringRecord) -> Result<Self, String> {
        if record.len() != 3 {
            return Err(format!("expected 3 fields, found {}", record.len()));
        }

        let timestamp = NaiveDateTime::parse_from_str(&record[0], TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad timestamp '{}': {}", &record[0], e))?;

        Ok(Self {
            timestamp,
            prompt: record[1].to_string(),
            response: record[2].to_string(),
        })
    }
}

fn serialize_timestamp<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Writes and reads the per-model log files under one directory
#[derive(Debug, Clone)]
pub struct ConversationLogger {
    log_dir: PathBuf,
}

impl ConversationLogger {
    /// Create a logger rooted at `log_dir`, creating the directory if needed
    pub fn new(log_dir: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let log_dir = log_dir.into();
        fs::create_dir_all(&log_dir).map_err(|source| HistoryError::Io {
            action: "Failed to create log directory",
            path: log_dir.clone(),
            source,
        })?;

        Ok(Self { log_dir })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the log file for `model`
    ///
    /// Path separators and NUL are percent-escaped (`%` itself becomes `%25`)
    /// so the file always sits directly inside the log directory and no two
    /// models share a file.
    pub fn path_for(&self, model: &str) -> Result<PathBuf, HistoryError> {
        if model.is_empty() || model == "." || model == ".." {
            return Err(HistoryError::InvalidModelName(model.to_string()));
        }

        let mut stem = String::with_capacity(model.len());
        for c in model.chars() {
            match c {
                '%' => stem.push_str("%25"),
                '/' => stem.push_str("%2F"),
                '\\' => stem.push_str("%5C"),
                '\0' => stem.push_str("%00"),
                other => stem.push(other),
            }
        }

        Ok(self
            .log_dir
            .join(format!("{}{}.{}", FILE_PREFIX, stem, FILE_EXTENSION)))
    }

    /// Append one entry to the model's log
    pub fn append(&self, model: &str, entry: &LogEntry) -> Result<(), HistoryError> {
        let path = self.path_for(model)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| HistoryError::Io {
                action: "Failed to open log file",
                path: path.clone(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let timestamp = entry.formatted_timestamp();
        writer
            .write_record([timestamp.as_str(), entry.prompt.as_str(), entry.response.as_str()])
            .map_err(|source| HistoryError::Csv {
                action: "Failed to write log entry to",
                path: path.clone(),
                source,
            })?;

        writer.flush().map_err(|source| HistoryError::Io {
            action: "Failed to flush log file",
            path: path.clone(),
            source,
        })?;

        debug!("Appended log entry for {} to {}", model, path.display());
        Ok(())
    }

    /// Stamp a new entry with the current time and append it
    pub fn record(
        &self,
        model: &str,
        prompt: &str,
        response: &str,
    ) -> Result<LogEntry, HistoryError> {
        let entry = LogEntry::now(prompt, response);
        self.append(model, &entry)?;
        Ok(entry)
    }

    /// Truncate the model's log to zero length
    ///
    /// A model without a log yet ends up with an empty file.
    pub fn clear(&self, model: &str) -> Result<(), HistoryError> {
        let path = self.path_for(model)?;

        File::create(&path).map_err(|source| HistoryError::Io {
            action: "Failed to truncate log file",
            path: path.clone(),
            source,
        })?;

        debug!("Cleared log for {} at {}", model, path.display());
        Ok(())
    }

    /// Read every entry in the model's log, oldest first
    pub fn entries(&self, model: &str) -> Result<Vec<LogEntry>, HistoryError> {
        let path = self.path_for(model)?;

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(HistoryError::Io {
                    action: "Failed to open log file",
                    path,
                    source,
                })
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut entries = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|source| HistoryError::Csv {
                action: "Failed to read log entry from",
                path: path.clone(),
                source,
            })?;

            let entry = LogEntry::from_record(&record).map_err(|reason| {
                HistoryError::Malformed {
                    path: path.clone(),
                    record: index + 1,
                    reason,
                }
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}
