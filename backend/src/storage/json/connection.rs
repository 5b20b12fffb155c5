use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::traits::Connection;

/// JsonConnection manages the data directory holding one JSON array
/// file per entity store, plus the session state file.
///
/// Every store is read and written whole: a mutation deserializes the
/// full array, applies the change in memory, and rewrites the file
/// through a temp-file rename. Last writer wins; there is no locking.
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new JSON connection rooted at a base directory, creating
    /// the directory if it does not exist.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("creating data directory {}", base_path.display()))?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// The directory all store files live in.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Full path of one store file.
    pub fn store_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Read a whole store array. A missing or empty file is an empty
    /// store, not an error; a malformed file is an error.
    pub(crate) fn read_array<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.store_path(file_name);

        if !path.exists() {
            debug!("store file {} does not exist yet, treating as empty", file_name);
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading store file {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("malformed store file {}", path.display()))
    }

    /// Rewrite a whole store array atomically (temp file + rename).
    pub(crate) fn write_array<T: Serialize>(&self, file_name: &str, items: &[T]) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory).with_context(|| {
                format!("creating data directory {}", self.base_directory.display())
            })?;
        }

        let path = self.store_path(file_name);
        let contents = serde_json::to_string_pretty(items)
            .with_context(|| format!("serializing store {}", file_name))?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("writing store file {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("replacing store file {}", path.display()))?;

        Ok(())
    }
}

impl Connection for JsonConnection {
    type Activities = super::activity_repository::ActivityRepository;
    type Bookings = super::booking_repository::BookingRepository;
    type Coaches = super::coach_repository::CoachRepository;
    type Payments = super::payment_repository::PaymentRepository;
    type Visitors = super::visitor_repository::VisitorRepository;
    type Reviews = super::review_repository::ReviewRepository;
    type Announcements = super::announcement_repository::AnnouncementRepository;
    type History = super::history_repository::HistoryRepository;
    type Session = super::session_repository::SessionRepository;

    fn activities(&self) -> Self::Activities {
        super::activity_repository::ActivityRepository::new(self.clone())
    }

    fn bookings(&self) -> Self::Bookings {
        super::booking_repository::BookingRepository::new(self.clone())
    }

    fn coaches(&self) -> Self::Coaches {
        super::coach_repository::CoachRepository::new(self.clone())
    }

    fn payments(&self) -> Self::Payments {
        super::payment_repository::PaymentRepository::new(self.clone())
    }

    fn visitors(&self) -> Self::Visitors {
        super::visitor_repository::VisitorRepository::new(self.clone())
    }

    fn reviews(&self) -> Self::Reviews {
        super::review_repository::ReviewRepository::new(self.clone())
    }

    fn announcements(&self) -> Self::Announcements {
        super::announcement_repository::AnnouncementRepository::new(self.clone())
    }

    fn history(&self) -> Self::History {
        super::history_repository::HistoryRepository::new(self.clone())
    }

    fn session(&self) -> Self::Session {
        super::session_repository::SessionRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        value: u32,
    }

    #[test]
    fn missing_store_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        let rows: Vec<Row> = connection.read_array("nothing.json").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        let rows = vec![
            Row {
                id: "1".into(),
                value: 10,
            },
            Row {
                id: "2".into(),
                value: 20,
            },
        ];
        connection.write_array("rows.json", &rows).unwrap();

        let loaded: Vec<Row> = connection.read_array("rows.json").unwrap();
        assert_eq!(loaded, rows);

        // No temp file left behind after the rename.
        assert!(!connection.store_path("rows.tmp").exists());
    }

    #[test]
    fn malformed_store_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        std::fs::write(connection.store_path("rows.json"), "{ not json").unwrap();
        let result: Result<Vec<Row>> = connection.read_array("rows.json");
        assert!(result.is_err());
    }
}
