use anyhow::Result;

use shared::Coach;

use super::connection::JsonConnection;
use crate::storage::traits::CoachStorage;

const STORE_FILE: &str = "coaches.json";

/// JSON-file coach repository.
#[derive(Clone)]
pub struct CoachRepository {
    connection: JsonConnection,
}

impl CoachRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Coach>> {
        self.connection.read_array(STORE_FILE)
    }
}

impl CoachStorage for CoachRepository {
    fn get(&self, id: &str) -> Result<Option<Coach>> {
        Ok(self.read_all()?.into_iter().find(|c| c.id == id))
    }

    fn upsert(&self, coach: &Coach) -> Result<()> {
        let mut coaches = self.read_all()?;
        match coaches.iter_mut().find(|c| c.id == coach.id) {
            Some(existing) => *existing = coach.clone(),
            None => coaches.push(coach.clone()),
        }
        self.connection.write_array(STORE_FILE, &coaches)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let coaches = self.read_all()?;
        let before = coaches.len();
        let remaining: Vec<Coach> = coaches.into_iter().filter(|c| c.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.connection.write_array(STORE_FILE, &remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Coach>> {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CoachStatus;
    use tempfile::TempDir;

    fn coach(id: &str, first_name: &str) -> Coach {
        Coach {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: "Lim".to_string(),
            email: "coach@example.com".to_string(),
            phone: "012-3456789".to_string(),
            specialization: "yoga".to_string(),
            custom_specialization: String::new(),
            status: CoachStatus::Active,
            bio: "Certified instructor".to_string(),
        }
    }

    #[test]
    fn upsert_get_delete_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = CoachRepository::new(connection);

        repo.upsert(&coach("c1", "Sarah")).unwrap();
        repo.upsert(&coach("c2", "Mike")).unwrap();

        assert_eq!(repo.get("c2").unwrap().unwrap().first_name, "Mike");
        assert!(repo.delete("c1").unwrap());
        assert!(!repo.delete("c1").unwrap());
        assert_eq!(repo.list().unwrap().len(), 1);
    }
}
