use anyhow::Result;

use shared::Payment;

use super::connection::JsonConnection;
use crate::storage::traits::PaymentStorage;

const STORE_FILE: &str = "payments.json";

/// JSON-file payment repository.
#[derive(Clone)]
pub struct PaymentRepository {
    connection: JsonConnection,
}

impl PaymentRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Payment>> {
        self.connection.read_array(STORE_FILE)
    }
}

impl PaymentStorage for PaymentRepository {
    fn get(&self, id: &str) -> Result<Option<Payment>> {
        Ok(self.read_all()?.into_iter().find(|p| p.id == id))
    }

    fn upsert(&self, payment: &Payment) -> Result<()> {
        let mut payments = self.read_all()?;
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => *existing = payment.clone(),
            None => payments.push(payment.clone()),
        }
        self.connection.write_array(STORE_FILE, &payments)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let payments = self.read_all()?;
        let before = payments.len();
        let remaining: Vec<Payment> = payments.into_iter().filter(|p| p.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.connection.write_array(STORE_FILE, &remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Payment>> {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{PaymentMethod, PaymentStatus};
    use tempfile::TempDir;

    #[test]
    fn amounts_survive_the_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = PaymentRepository::new(connection);

        let payment = Payment {
            id: "p1".to_string(),
            customer_name: "John Lim".to_string(),
            activity: "yoga".to_string(),
            activity_date: "2025-09-16".parse().unwrap(),
            activity_time: "18:32".to_string(),
            payment_date: "2025-09-10".parse().unwrap(),
            method: PaymentMethod::TngEwallet,
            amount: 45.50,
            status: PaymentStatus::Paid,
            notes: String::new(),
        };
        repo.upsert(&payment).unwrap();

        let loaded = repo.get("p1").unwrap().unwrap();
        assert_eq!(loaded, payment);
        assert_eq!(loaded.method, PaymentMethod::TngEwallet);
    }
}
