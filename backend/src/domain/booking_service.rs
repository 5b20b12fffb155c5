//! Booking service: customer bookings against activity time slots,
//! capacity enforcement, and the booking audit trail.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{info, warn};

use shared::{
    generate_record_id, Activity, Booking, BookingHistoryEntry, BookingSlot, BookingStatistics,
    BookingStatus, CreateBookingRequest, HistoryAction, UpdateBookingRequest,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{ActivityStorage, BookingStorage, Connection, HistoryStorage};

pub struct BookingService<C: Connection> {
    bookings: C::Bookings,
    activities: C::Activities,
    history: C::History,
}

impl<C: Connection> BookingService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            bookings: connection.bookings(),
            activities: connection.activities(),
            history: connection.history(),
        }
    }

    /// Create a booking for an explicitly selected slot, enforcing the
    /// slot's capacity against existing confirmed bookings.
    pub fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking> {
        info!(
            "Creating booking: activity={} customer={}",
            request.activity_id, request.customer_name
        );

        if request.activity_id.trim().is_empty()
            || request.customer_name.trim().is_empty()
            || request.customer_email.trim().is_empty()
            || request.customer_phone.trim().is_empty()
        {
            return Err(validation("Please fill in all required fields!"));
        }

        let activity = self
            .activities
            .get(&request.activity_id)?
            .ok_or_else(|| not_found("Activity", request.activity_id.clone()))?;

        let slot = request.slot.ok_or_else(|| {
            validation("Please select a date and time slot before adding a booking!")
        })?;

        let capacity = slot_capacity(&activity, slot.date, &slot.time);
        let confirmed = self.booking_count(&activity.id, slot.date, &slot.time)?;
        if confirmed >= capacity {
            return Err(validation(format!(
                "This time slot is full! Capacity: {}",
                capacity
            )));
        }

        let booking = Booking {
            id: generate_record_id(Utc::now().timestamp_millis()),
            activity_id: request.activity_id,
            customer_name: request.customer_name.trim().to_string(),
            customer_email: request.customer_email.trim().to_string(),
            customer_phone: request.customer_phone.trim().to_string(),
            booking_date: slot.date,
            booking_time: slot.time,
            status: request.status,
            created_at: Utc::now().to_rfc3339(),
        };

        self.bookings.upsert(&booking)?;
        self.record_history(HistoryAction::AddBooking, &booking)?;
        info!("Created booking {} for activity {}", booking.id, booking.activity_id);
        Ok(booking)
    }

    /// Merge a field-wise patch into an existing booking.
    pub fn update_booking(&self, id: &str, patch: UpdateBookingRequest) -> Result<Booking> {
        let mut booking = self
            .bookings
            .get(id)?
            .ok_or_else(|| not_found("Booking", id))?;

        if let Some(customer_name) = patch.customer_name {
            booking.customer_name = customer_name.trim().to_string();
        }
        if let Some(customer_email) = patch.customer_email {
            booking.customer_email = customer_email.trim().to_string();
        }
        if let Some(customer_phone) = patch.customer_phone {
            booking.customer_phone = customer_phone.trim().to_string();
        }
        if let Some(booking_date) = patch.booking_date {
            booking.booking_date = booking_date;
        }
        if let Some(booking_time) = patch.booking_time {
            booking.booking_time = booking_time;
        }
        if let Some(status) = patch.status {
            booking.status = status;
        }

        self.bookings.upsert(&booking)?;
        self.record_history(HistoryAction::EditBooking, &booking)?;
        info!("Updated booking {}", booking.id);
        Ok(booking)
    }

    /// Delete by id. Returns false for an absent id.
    pub fn delete_booking(&self, id: &str) -> Result<bool> {
        let Some(booking) = self.bookings.get(id)? else {
            warn!("Delete requested for unknown booking {}", id);
            return Ok(false);
        };

        let removed = self.bookings.delete(id)?;
        if removed {
            self.record_history(HistoryAction::DeleteBooking, &booking)?;
            info!("Deleted booking {}", id);
        }
        Ok(removed)
    }

    pub fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.bookings.list()
    }

    pub fn bookings_for_activity(&self, activity_id: &str) -> Result<Vec<Booking>> {
        self.bookings.list_for_activity(activity_id)
    }

    /// Delete an activity and cascade to every booking referencing it.
    /// Returns the number of bookings removed.
    pub fn delete_activity(&self, activity_id: &str) -> Result<u32> {
        let activity_removed = self.activities.delete(activity_id)?;
        let bookings_removed = self.bookings.delete_for_activity(activity_id)?;

        if activity_removed {
            info!(
                "Deleted activity {} and {} associated booking(s)",
                activity_id, bookings_removed
            );
        } else {
            warn!("Cascade delete for unknown activity {}", activity_id);
        }
        Ok(bookings_removed)
    }

    /// Confirmed bookings for one (activity, date, time) slot.
    pub fn booking_count(&self, activity_id: &str, date: NaiveDate, time: &str) -> Result<u32> {
        Ok(self
            .bookings
            .list()?
            .iter()
            .filter(|b| {
                b.activity_id == activity_id
                    && b.booking_date == date
                    && b.booking_time == time
                    && b.status == BookingStatus::Confirmed
            })
            .count() as u32)
    }

    /// Capacity of one slot of an activity, resolving through the
    /// fallback rules. 0 when the activity does not exist.
    pub fn slot_capacity_for(
        &self,
        activity_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<u32> {
        Ok(match self.activities.get(activity_id)? {
            Some(activity) => slot_capacity(&activity, date, time),
            None => 0,
        })
    }

    /// Duration of one slot of an activity, resolving through the
    /// fallback rules. 120 when the activity does not exist.
    pub fn slot_duration_for(
        &self,
        activity_id: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<u32> {
        Ok(match self.activities.get(activity_id)? {
            Some(activity) => slot_duration(&activity, date, time),
            None => 120,
        })
    }

    /// Deduplicated union of the activity's authored slots and the
    /// slots implied by its existing bookings, authored slots first.
    pub fn activity_slots(&self, activity_id: &str) -> Result<Vec<BookingSlot>> {
        let mut slots: Vec<BookingSlot> = Vec::new();
        let push_unique = |slot: BookingSlot, slots: &mut Vec<BookingSlot>| {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        };

        let activity = self.activities.get(activity_id)?;
        if let Some(ref activity) = activity {
            for slot in &activity.time_slots {
                push_unique(
                    BookingSlot {
                        date: slot.date,
                        time: slot.time.clone(),
                        capacity: if slot.capacity > 0 {
                            slot.capacity
                        } else {
                            activity.capacity
                        },
                    },
                    &mut slots,
                );
            }
        }

        if let Some(ref activity) = activity {
            for booking in self.bookings.list_for_activity(activity_id)? {
                push_unique(
                    BookingSlot {
                        date: booking.booking_date,
                        time: booking.booking_time.clone(),
                        capacity: activity.capacity,
                    },
                    &mut slots,
                );
            }
        }

        Ok(slots)
    }

    /// Booking counts by status.
    pub fn statistics(&self) -> Result<BookingStatistics> {
        let bookings = self.bookings.list()?;
        let count =
            |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count() as u32;

        Ok(BookingStatistics {
            total: bookings.len() as u32,
            confirmed: count(BookingStatus::Confirmed),
            pending: count(BookingStatus::Pending),
            cancelled: count(BookingStatus::Cancelled),
        })
    }

    /// The audit trail, most recent first.
    pub fn history(&self) -> Result<Vec<BookingHistoryEntry>> {
        let mut entries = self.history.list()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    fn record_history(&self, action: HistoryAction, booking: &Booking) -> Result<()> {
        self.history.append(&BookingHistoryEntry {
            id: generate_record_id(Utc::now().timestamp_millis()),
            action,
            booking_id: booking.id.clone(),
            customer_name: booking.customer_name.clone(),
            activity_id: booking.activity_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

/// Resolve the capacity of one slot: the authored slot when it exists
/// and carries a capacity, otherwise scaled from the activity capacity
/// by the hour of day (morning 80%, afternoon 120%, evening 60%).
pub fn slot_capacity(activity: &Activity, date: NaiveDate, time: &str) -> u32 {
    let authored = activity
        .time_slots
        .iter()
        .find(|slot| slot.date == date && slot.time == time);
    if let Some(slot) = authored {
        if slot.capacity > 0 {
            return slot.capacity;
        }
    }

    scale_by_hour(activity.capacity, time)
}

/// Resolve the duration of one slot; same fallback shape as capacity,
/// scaling the activity's base duration (or 120 when unset).
pub fn slot_duration(activity: &Activity, date: NaiveDate, time: &str) -> u32 {
    let authored = activity
        .time_slots
        .iter()
        .find(|slot| slot.date == date && slot.time == time);
    if let Some(slot) = authored {
        if slot.duration_minutes > 0 {
            return slot.duration_minutes;
        }
    }

    let base = if activity.duration_minutes > 0 {
        activity.duration_minutes
    } else {
        120
    };
    scale_by_hour(base, time)
}

fn scale_by_hour(base: u32, time: &str) -> u32 {
    let hour: Option<u32> = time.split(':').next().and_then(|h| h.parse().ok());
    let factor = match hour {
        Some(h) if h < 12 => 0.8,
        Some(h) if h < 18 => 1.2,
        _ => 0.6,
    };
    (base as f64 * factor).floor() as u32
}
