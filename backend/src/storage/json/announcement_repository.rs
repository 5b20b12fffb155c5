use anyhow::Result;

use shared::Announcement;

use super::connection::JsonConnection;
use crate::storage::traits::AnnouncementStorage;

const STORE_FILE: &str = "announcements.json";

/// JSON-file announcement repository.
#[derive(Clone)]
pub struct AnnouncementRepository {
    connection: JsonConnection,
}

impl AnnouncementRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Announcement>> {
        self.connection.read_array(STORE_FILE)
    }
}

impl AnnouncementStorage for AnnouncementRepository {
    fn get(&self, id: &str) -> Result<Option<Announcement>> {
        Ok(self.read_all()?.into_iter().find(|a| a.id == id))
    }

    fn upsert(&self, announcement: &Announcement) -> Result<()> {
        let mut announcements = self.read_all()?;
        match announcements.iter_mut().find(|a| a.id == announcement.id) {
            Some(existing) => *existing = announcement.clone(),
            None => announcements.push(announcement.clone()),
        }
        self.connection.write_array(STORE_FILE, &announcements)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let announcements = self.read_all()?;
        let before = announcements.len();
        let remaining: Vec<Announcement> =
            announcements.into_iter().filter(|a| a.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.connection.write_array(STORE_FILE, &remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Announcement>> {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AnnouncementStatus, Priority};
    use tempfile::TempDir;

    #[test]
    fn optional_fields_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = AnnouncementRepository::new(connection);

        let announcement = Announcement {
            id: "n1".to_string(),
            title: "Studio closed for maintenance".to_string(),
            content: "The studio is closed this Friday.".to_string(),
            send_to: "all".to_string(),
            image: None,
            priority: Priority::High,
            expiry_date: Some("2025-09-20".parse().unwrap()),
            status: AnnouncementStatus::Published,
            created_at: "2025-09-15T09:00:00+00:00".to_string(),
            published_at: Some("2025-09-15T09:00:00+00:00".to_string()),
        };
        repo.upsert(&announcement).unwrap();

        let loaded = repo.get("n1").unwrap().unwrap();
        assert_eq!(loaded, announcement);
        assert!(loaded.image.is_none());
    }
}
