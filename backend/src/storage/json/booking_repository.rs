use anyhow::Result;
use log::info;

use shared::Booking;

use super::connection::JsonConnection;
use crate::storage::traits::BookingStorage;

const STORE_FILE: &str = "bookings.json";

/// JSON-file booking repository.
#[derive(Clone)]
pub struct BookingRepository {
    connection: JsonConnection,
}

impl BookingRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Booking>> {
        self.connection.read_array(STORE_FILE)
    }

    fn write_all(&self, bookings: &[Booking]) -> Result<()> {
        self.connection.write_array(STORE_FILE, bookings)
    }
}

impl BookingStorage for BookingRepository {
    fn get(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.read_all()?.into_iter().find(|b| b.id == id))
    }

    fn upsert(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.read_all()?;
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => *existing = booking.clone(),
            None => bookings.push(booking.clone()),
        }
        self.write_all(&bookings)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let bookings = self.read_all()?;
        let before = bookings.len();
        let remaining: Vec<Booking> = bookings.into_iter().filter(|b| b.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.write_all(&remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Booking>> {
        self.read_all()
    }

    fn list_for_activity(&self, activity_id: &str) -> Result<Vec<Booking>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|b| b.activity_id == activity_id)
            .collect())
    }

    fn delete_for_activity(&self, activity_id: &str) -> Result<u32> {
        let bookings = self.read_all()?;
        let before = bookings.len();
        let remaining: Vec<Booking> = bookings
            .into_iter()
            .filter(|b| b.activity_id != activity_id)
            .collect();

        let removed = (before - remaining.len()) as u32;
        if removed > 0 {
            self.write_all(&remaining)?;
            info!(
                "removed {} booking(s) referencing activity {}",
                removed, activity_id
            );
        }
        Ok(removed)
    }
}
