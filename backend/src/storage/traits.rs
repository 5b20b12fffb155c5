//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow
//! different storage backends to be used interchangeably in the domain
//! layer. Every entity family gets the same narrow repository surface
//! (`get`, `upsert`, `delete`, `list`); families with extra persistence
//! needs (cascades, reset, append-only trails) extend it minimally.

use anyhow::Result;
use shared::{
    Activity, Announcement, Booking, BookingHistoryEntry, Coach, Payment, Review, Visitor,
};

/// Storage for the shared activity store, the system of record every
/// other component reads.
pub trait ActivityStorage: Send + Sync {
    /// Retrieve a specific activity by id.
    fn get(&self, id: &str) -> Result<Option<Activity>>;

    /// Insert the activity, or replace the stored record with the same id.
    fn upsert(&self, activity: &Activity) -> Result<()>;

    /// Delete by id. Returns false (and leaves the store unchanged) when
    /// the id is absent.
    fn delete(&self, id: &str) -> Result<bool>;

    /// List all activities in stored order.
    fn list(&self) -> Result<Vec<Activity>>;

    /// Replace the whole store contents. Used by the sample-data reset.
    fn replace_all(&self, activities: &[Activity]) -> Result<()>;
}

/// Storage for customer bookings.
pub trait BookingStorage: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Booking>>;
    fn upsert(&self, booking: &Booking) -> Result<()>;
    fn delete(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Booking>>;

    /// List bookings referencing one activity, in stored order.
    fn list_for_activity(&self, activity_id: &str) -> Result<Vec<Booking>>;

    /// Cascade helper: remove every booking referencing the activity.
    /// Returns the number of bookings removed.
    fn delete_for_activity(&self, activity_id: &str) -> Result<u32>;
}

pub trait CoachStorage: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Coach>>;
    fn upsert(&self, coach: &Coach) -> Result<()>;
    fn delete(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Coach>>;
}

pub trait PaymentStorage: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Payment>>;
    fn upsert(&self, payment: &Payment) -> Result<()>;
    fn delete(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Payment>>;
}

pub trait VisitorStorage: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Visitor>>;
    fn upsert(&self, visitor: &Visitor) -> Result<()>;
    fn delete(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Visitor>>;
}

pub trait ReviewStorage: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Review>>;
    fn upsert(&self, review: &Review) -> Result<()>;
    fn delete(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Review>>;
}

pub trait AnnouncementStorage: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Announcement>>;
    fn upsert(&self, announcement: &Announcement) -> Result<()>;
    fn delete(&self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<Announcement>>;
}

/// Append-only audit trail of booking mutations.
pub trait HistoryStorage: Send + Sync {
    fn append(&self, entry: &BookingHistoryEntry) -> Result<()>;
    fn list(&self) -> Result<Vec<BookingHistoryEntry>>;
}

/// One-shot mailbox carrying the id of the activity being edited from
/// the dashboard to the class editor. Session-scoped state, not part of
/// any entity store.
pub trait SessionStorage: Send + Sync {
    fn set_editing_activity(&self, activity_id: &str) -> Result<()>;
    fn editing_activity(&self) -> Result<Option<String>>;
    fn clear_editing_activity(&self) -> Result<()>;
}

/// Trait defining the interface for storage connections.
///
/// Abstracts away the concrete store (JSON files here) and provides
/// factory methods for creating repositories, so the domain layer can
/// work with any backend without knowing the implementation.
pub trait Connection: Send + Sync + Clone {
    type Activities: ActivityStorage;
    type Bookings: BookingStorage;
    type Coaches: CoachStorage;
    type Payments: PaymentStorage;
    type Visitors: VisitorStorage;
    type Reviews: ReviewStorage;
    type Announcements: AnnouncementStorage;
    type History: HistoryStorage;
    type Session: SessionStorage;

    fn activities(&self) -> Self::Activities;
    fn bookings(&self) -> Self::Bookings;
    fn coaches(&self) -> Self::Coaches;
    fn payments(&self) -> Self::Payments;
    fn visitors(&self) -> Self::Visitors;
    fn reviews(&self) -> Self::Reviews;
    fn announcements(&self) -> Self::Announcements;
    fn history(&self) -> Self::History;
    fn session(&self) -> Self::Session;
}
