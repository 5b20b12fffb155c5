use anyhow::Result;

use shared::Review;

use super::connection::JsonConnection;
use crate::storage::traits::ReviewStorage;

const STORE_FILE: &str = "reviews.json";

/// JSON-file review repository.
#[derive(Clone)]
pub struct ReviewRepository {
    connection: JsonConnection,
}

impl ReviewRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Review>> {
        self.connection.read_array(STORE_FILE)
    }
}

impl ReviewStorage for ReviewRepository {
    fn get(&self, id: &str) -> Result<Option<Review>> {
        Ok(self.read_all()?.into_iter().find(|r| r.id == id))
    }

    fn upsert(&self, review: &Review) -> Result<()> {
        let mut reviews = self.read_all()?;
        match reviews.iter_mut().find(|r| r.id == review.id) {
            Some(existing) => *existing = review.clone(),
            None => reviews.push(review.clone()),
        }
        self.connection.write_array(STORE_FILE, &reviews)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let reviews = self.read_all()?;
        let before = reviews.len();
        let remaining: Vec<Review> = reviews.into_iter().filter(|r| r.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.connection.write_array(STORE_FILE, &remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Review>> {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tags_and_reply_fields_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = ReviewRepository::new(connection);

        let review = Review {
            id: "r1".to_string(),
            activity_id: "a1".to_string(),
            activity_name: "Yoga - Beginner".to_string(),
            customer_name: "Emma Davis".to_string(),
            customer_email: "emma@example.com".to_string(),
            rating: 5,
            comment: "Perfect for beginners!".to_string(),
            tags: vec!["Beginner-friendly".to_string(), "Comfortable".to_string()],
            review_date: "2025-01-11".parse().unwrap(),
            review_time: "11:30".to_string(),
            admin_reply: String::new(),
            admin_reply_date: None,
            admin_reply_time: None,
            created_at: "2025-01-11T11:30:00+00:00".to_string(),
        };
        repo.upsert(&review).unwrap();

        let loaded = repo.get("r1").unwrap().unwrap();
        assert_eq!(loaded.tags.len(), 2);
        assert!(loaded.admin_reply_date.is_none());
        assert_eq!(loaded, review);
    }
}
