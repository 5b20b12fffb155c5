//! # Domain Module
//!
//! Business logic for the activity administration backend.
//!
//! One service per entity family, each constructed over injected
//! storage and independent of any presentation layer:
//!
//! - **activity_service**: the shared activity store and its dashboard
//!   and edit projections
//! - **booking_service**: bookings, slot capacity enforcement, and the
//!   booking audit trail
//! - **coach_service / payment_service / visitor_service**: roster and
//!   records management with filters and summary statistics
//! - **review_service**: customer reviews and admin replies
//! - **announcement_service**: publishing, drafts, and expiry-aware
//!   filtering
//! - **formatting**: shared date/time display rules

pub mod activity_service;
pub mod announcement_service;
pub mod booking_service;
pub mod coach_service;
pub mod formatting;
pub mod payment_service;
pub mod review_service;
pub mod visitor_service;

pub use activity_service::ActivityService;
pub use announcement_service::AnnouncementService;
pub use booking_service::BookingService;
pub use coach_service::CoachService;
pub use payment_service::PaymentService;
pub use review_service::ReviewService;
pub use visitor_service::VisitorService;
