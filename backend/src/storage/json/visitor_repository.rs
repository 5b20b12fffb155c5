use anyhow::Result;

use shared::Visitor;

use super::connection::JsonConnection;
use crate::storage::traits::VisitorStorage;

const STORE_FILE: &str = "visitors.json";

/// JSON-file visitor repository.
#[derive(Clone)]
pub struct VisitorRepository {
    connection: JsonConnection,
}

impl VisitorRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Visitor>> {
        self.connection.read_array(STORE_FILE)
    }
}

impl VisitorStorage for VisitorRepository {
    fn get(&self, id: &str) -> Result<Option<Visitor>> {
        Ok(self.read_all()?.into_iter().find(|v| v.id == id))
    }

    fn upsert(&self, visitor: &Visitor) -> Result<()> {
        let mut visitors = self.read_all()?;
        match visitors.iter_mut().find(|v| v.id == visitor.id) {
            Some(existing) => *existing = visitor.clone(),
            None => visitors.push(visitor.clone()),
        }
        self.connection.write_array(STORE_FILE, &visitors)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let visitors = self.read_all()?;
        let before = visitors.len();
        let remaining: Vec<Visitor> = visitors.into_iter().filter(|v| v.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.connection.write_array(STORE_FILE, &remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Visitor>> {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::VisitorType;
    use tempfile::TempDir;

    #[test]
    fn guest_records_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = VisitorRepository::new(connection);

        let visitor = Visitor {
            id: "v1".to_string(),
            name: "Guest User".to_string(),
            email: "Unknown".to_string(),
            visitor_type: VisitorType::Unregistered,
            source: "walk_in".to_string(),
            visit_date: "2025-09-16".parse().unwrap(),
            visit_time: "14:00".to_string(),
            notes: String::new(),
        };
        repo.upsert(&visitor).unwrap();

        assert_eq!(repo.get("v1").unwrap().unwrap(), visitor);
        assert!(repo.delete("v1").unwrap());
        assert!(repo.list().unwrap().is_empty());
    }
}
