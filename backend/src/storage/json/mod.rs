//! JSON-file storage backend.
//!
//! One JSON array file per entity store under one base directory, plus
//! a YAML session file. The activity repository doubles as the
//! normalization boundary for legacy record shapes.

pub mod activity_repository;
pub mod announcement_repository;
pub mod booking_repository;
pub mod coach_repository;
pub mod connection;
pub mod history_repository;
pub mod payment_repository;
pub mod review_repository;
pub mod session_repository;
pub mod visitor_repository;

pub use activity_repository::ActivityRepository;
pub use announcement_repository::AnnouncementRepository;
pub use booking_repository::BookingRepository;
pub use coach_repository::CoachRepository;
pub use connection::JsonConnection;
pub use history_repository::HistoryRepository;
pub use payment_repository::PaymentRepository;
pub use review_repository::ReviewRepository;
pub use session_repository::SessionRepository;
pub use visitor_repository::VisitorRepository;
