use anyhow::Result;

use shared::BookingHistoryEntry;

use super::connection::JsonConnection;
use crate::storage::traits::HistoryStorage;

const STORE_FILE: &str = "booking_history.json";

/// Append-only JSON store for the booking audit trail.
#[derive(Clone)]
pub struct HistoryRepository {
    connection: JsonConnection,
}

impl HistoryRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

impl HistoryStorage for HistoryRepository {
    fn append(&self, entry: &BookingHistoryEntry) -> Result<()> {
        let mut entries: Vec<BookingHistoryEntry> = self.connection.read_array(STORE_FILE)?;
        entries.push(entry.clone());
        self.connection.write_array(STORE_FILE, &entries)
    }

    fn list(&self) -> Result<Vec<BookingHistoryEntry>> {
        self.connection.read_array(STORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::HistoryAction;
    use tempfile::TempDir;

    #[test]
    fn entries_append_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = HistoryRepository::new(connection);

        for (i, action) in [
            HistoryAction::AddBooking,
            HistoryAction::EditBooking,
            HistoryAction::DeleteBooking,
        ]
        .iter()
        .enumerate()
        {
            repo.append(&BookingHistoryEntry {
                id: format!("h{}", i),
                action: *action,
                booking_id: "b1".to_string(),
                customer_name: "Alice Tan".to_string(),
                activity_id: "a1".to_string(),
                timestamp: format!("2025-09-0{}T10:00:00+00:00", i + 1),
            })
            .unwrap();
        }

        let entries = repo.list().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, HistoryAction::AddBooking);
        assert_eq!(entries[2].action, HistoryAction::DeleteBooking);
    }
}
