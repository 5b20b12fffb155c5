//! # Activity Administration Backend
//!
//! Data layer for an activity/booking administration suite: activities
//! (classes) with per-date time slots, bookings against those slots,
//! plus coaches, payments, visitors, reviews, and announcements.
//!
//! The backend is UI-agnostic. It follows a layered architecture:
//!
//! ```text
//! Caller (desktop shell, CLI, tests)
//!     ↓
//! Domain layer (services, validation, statistics)
//!     ↓
//! Storage layer (repository traits, JSON-file backend)
//! ```
//!
//! Each entity store is one JSON array file rewritten whole on every
//! mutation; the activity store additionally normalizes legacy record
//! shapes on load. Services are constructed with injected storage, so
//! any `Connection` implementation can stand in for the JSON backend.

pub mod domain;
pub mod error;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::Path;

use crate::domain::{
    ActivityService, AnnouncementService, BookingService, CoachService, PaymentService,
    ReviewService, VisitorService,
};
use crate::storage::json::JsonConnection;

pub use crate::error::DomainError;

/// All services wired over one storage connection.
pub struct AppState {
    pub activity_service: ActivityService<JsonConnection>,
    pub booking_service: BookingService<JsonConnection>,
    pub coach_service: CoachService<JsonConnection>,
    pub payment_service: PaymentService<JsonConnection>,
    pub visitor_service: VisitorService<JsonConnection>,
    pub review_service: ReviewService<JsonConnection>,
    pub announcement_service: AnnouncementService<JsonConnection>,
}

impl AppState {
    /// Open (or create) the data directory and construct every service
    /// over it. Empty stores that ship with samples are seeded.
    pub fn initialize<P: AsRef<Path>>(base_directory: P) -> Result<AppState> {
        let connection = JsonConnection::new(base_directory)?;
        info!(
            "Backend initialized at {}",
            connection.base_directory().display()
        );

        let state = AppState {
            activity_service: ActivityService::new(&connection),
            booking_service: BookingService::new(&connection),
            coach_service: CoachService::new(&connection),
            payment_service: PaymentService::new(&connection),
            visitor_service: VisitorService::new(&connection),
            review_service: ReviewService::new(&connection),
            announcement_service: AnnouncementService::new(&connection),
        };

        state.review_service.seed_sample_reviews()?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{BookingStatus, CreateActivityRequest, CreateBookingRequest, SlotSelection};
    use shared::{TimeSlot, TimeSlotStatus};
    use tempfile::TempDir;

    #[test]
    fn initialize_seeds_reviews_and_wires_services_over_one_store() {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::initialize(temp_dir.path()).unwrap();

        // Review samples arrive on first initialization only.
        let seeded = state.review_service.list_reviews().unwrap();
        assert!(!seeded.is_empty());

        // An activity created through one service is visible to another.
        let activity = state
            .activity_service
            .create_activity(CreateActivityRequest {
                name: "Yoga - Beginner".to_string(),
                description: "Entry-level yoga".to_string(),
                activity_type: "yoga".to_string(),
                capacity: 4,
                duration_minutes: 60,
                image: None,
                time_slots: vec![TimeSlot {
                    date: "2025-09-16".parse().unwrap(),
                    time: "10:00".to_string(),
                    capacity: 4,
                    price: 15.0,
                    duration_minutes: 60,
                    status: TimeSlotStatus::Active,
                }],
            })
            .unwrap();

        let booking = state
            .booking_service
            .create_booking(CreateBookingRequest {
                activity_id: activity.id.clone(),
                customer_name: "Alice Tan".to_string(),
                customer_email: "alice@example.com".to_string(),
                customer_phone: "012-3456789".to_string(),
                status: BookingStatus::Confirmed,
                slot: Some(SlotSelection {
                    date: "2025-09-16".parse().unwrap(),
                    time: "10:00".to_string(),
                }),
            })
            .unwrap();
        assert_eq!(booking.activity_id, activity.id);

        // Re-initializing over the same directory sees the same data
        // and does not re-seed.
        let reopened = AppState::initialize(temp_dir.path()).unwrap();
        assert_eq!(reopened.review_service.list_reviews().unwrap().len(), seeded.len());
        assert!(reopened
            .activity_service
            .get_activity(&activity.id)
            .unwrap()
            .is_some());
    }
}
