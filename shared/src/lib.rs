use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Placeholder used when an activity is created or normalized without a
/// usable image string.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/400x200/667eea/ffffff?text=Activity+Image";

/// Largest id handed out so far, so ids stay unique within a process.
static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Generate a record id from a millisecond timestamp.
///
/// Every entity in the system uses timestamp-derived decimal string
/// ids. Calls landing on an already-issued millisecond are nudged
/// forward one, so ids stay unique within the process.
pub fn generate_record_id(timestamp_millis: i64) -> String {
    let mut last = LAST_ID_MILLIS.load(Ordering::Relaxed);
    loop {
        let candidate = timestamp_millis.max(last + 1);
        match LAST_ID_MILLIS.compare_exchange(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// Lifecycle status of an activity as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Active,
    Inactive,
}

/// Status of a single bookable time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlotStatus {
    Active,
    Upcoming,
    Closed,
    Cancelled,
    Pending,
}

impl fmt::Display for TimeSlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeSlotStatus::Active => "active",
            TimeSlotStatus::Upcoming => "upcoming",
            TimeSlotStatus::Closed => "closed",
            TimeSlotStatus::Cancelled => "cancelled",
            TimeSlotStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

/// A specific date+time instance of an activity with its own capacity,
/// price and duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    /// Wall-clock time in `HH:MM` form. Slot identity is the (date, time)
    /// pair, compared as stored.
    pub time: String,
    pub capacity: u32,
    pub price: f64,
    pub duration_minutes: u32,
    pub status: TimeSlotStatus,
}

/// Derived display view of a time slot. Never authored directly; always
/// re-derived from the owning activity's `time_slots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotView {
    /// `YYYY-MM-DD HH:MM`
    pub date_time: String,
    pub available: bool,
    pub selected: bool,
}

impl TimeSlot {
    /// Derive the display view for this slot.
    pub fn view(&self) -> TimeSlotView {
        TimeSlotView {
            date_time: format!("{} {}", self.date, self.time),
            available: self.status == TimeSlotStatus::Active,
            selected: false,
        }
    }
}

/// Re-derive the `times` view list from a slot list.
pub fn derive_time_views(slots: &[TimeSlot]) -> Vec<TimeSlotView> {
    slots.iter().map(TimeSlot::view).collect()
}

/// A bookable offering with one or more time slots.
///
/// This is the unified record shape; legacy field spellings
/// (`className`, `activityType`, authored `times`) are folded into it
/// once, at the storage adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub activity_type: String,
    pub capacity: u32,
    pub duration_minutes: u32,
    /// Image URL or data URL, always a string.
    pub image: String,
    pub status: ActivityStatus,
    pub current_bookings: u32,
    pub time_slots: Vec<TimeSlot>,
    /// Derived from `time_slots` on every write.
    pub times: Vec<TimeSlotView>,
}

/// Dashboard-facing projection of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capacity: u32,
    pub current_bookings: u32,
    pub duration_minutes: u32,
    pub image: String,
    pub times: Vec<TimeSlotView>,
    pub status: ActivityStatus,
    pub activity_type: String,
}

/// Edit-form projection of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub activity_type: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActivityRequest {
    pub name: String,
    pub description: String,
    pub activity_type: String,
    pub capacity: u32,
    pub duration_minutes: u32,
    pub image: Option<String>,
    pub time_slots: Vec<TimeSlot>,
}

/// Field-wise patch for an activity. Absent fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub activity_type: Option<String>,
    pub capacity: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub image: Option<String>,
    pub status: Option<ActivityStatus>,
    pub time_slots: Option<Vec<TimeSlot>>,
}

/// Aggregate numbers for the admin dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStatistics {
    pub total_bookings: u32,
    pub active_activities: u32,
    pub total_capacity: u32,
    /// Rounded percent; 0 when total capacity is 0.
    pub occupancy_rate: u32,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

/// A customer booking against one activity time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    /// Foreign key into the activity store, compared as a string.
    pub activity_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub booking_date: NaiveDate,
    /// `HH:MM`, compared as stored.
    pub booking_time: String,
    pub status: BookingStatus,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// The (date, time) pair a customer picked before booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSelection {
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub activity_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub status: BookingStatus,
    /// A booking cannot be created without an explicit slot selection.
    pub slot: Option<SlotSelection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<String>,
    pub status: Option<BookingStatus>,
}

/// One entry in the deduplicated union of an activity's authored slots
/// and the slots implied by its existing bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingSlot {
    pub date: NaiveDate,
    pub time: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingStatistics {
    pub total: u32,
    pub confirmed: u32,
    pub pending: u32,
    pub cancelled: u32,
}

/// Kind of booking mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    AddBooking,
    EditBooking,
    DeleteBooking,
}

/// Append-only record of a booking mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingHistoryEntry {
    pub id: String,
    pub action: HistoryAction,
    pub booking_id: String,
    pub customer_name: String,
    pub activity_id: String,
    /// RFC 3339.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Coaches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoachStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Specialization key (`yoga`, `weaving`, `fitness`, `other`, ...).
    pub specialization: String,
    /// Required iff `specialization == "other"`, empty otherwise.
    pub custom_specialization: String,
    pub status: CoachStatus,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCoachRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub custom_specialization: String,
    pub status: CoachStatus,
    pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCoachRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub custom_specialization: Option<String>,
    pub status: Option<CoachStatus>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachFilter {
    /// Case-insensitive match over name, email and specialization.
    pub search: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<CoachStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachStatistics {
    pub total: u32,
    pub active: u32,
    pub inactive: u32,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    BankTransfer,
    TngEwallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

/// A customer payment record. Linked to activities by activity *type*
/// string, not id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub customer_name: String,
    /// Activity type string the payment was made for.
    pub activity: String,
    pub activity_date: NaiveDate,
    pub activity_time: String,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub amount: f64,
    pub status: PaymentStatus,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub customer_name: String,
    pub activity: String,
    pub activity_date: NaiveDate,
    pub activity_time: String,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub amount: f64,
    pub status: PaymentStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    pub customer_name: Option<String>,
    pub activity: Option<String>,
    pub activity_date: Option<NaiveDate>,
    pub activity_time: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub method: Option<PaymentMethod>,
    pub amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentFilter {
    /// Case-insensitive match over customer name, activity and notes.
    pub search: Option<String>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatistics {
    pub paid_total: f64,
    pub pending_total: f64,
    pub paid_count: u32,
    pub pending_count: u32,
    pub failed_count: u32,
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitorType {
    Registered,
    Unregistered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: String,
    /// `"Guest User"` for unregistered visitors.
    pub name: String,
    /// `"Unknown"` for unregistered visitors.
    pub email: String,
    pub visitor_type: VisitorType,
    /// Acquisition channel (`website`, `walk_in`, `social_media`,
    /// `referral`, ...).
    pub source: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVisitorRequest {
    /// Required for registered visitors, ignored for unregistered.
    pub name: Option<String>,
    /// Required for registered visitors, ignored for unregistered.
    pub email: Option<String>,
    pub visitor_type: VisitorType,
    pub source: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateVisitorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub visitor_type: Option<VisitorType>,
    pub source: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitorFilter {
    pub search: Option<String>,
    pub visitor_type: Option<VisitorType>,
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorStatistics {
    pub total: u32,
    pub registered: u32,
    pub unregistered: u32,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// A customer review of an activity, optionally carrying an admin reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub activity_id: String,
    pub activity_name: String,
    pub customer_name: String,
    pub customer_email: String,
    /// 1 through 5 stars.
    pub rating: u8,
    pub comment: String,
    pub tags: Vec<String>,
    pub review_date: NaiveDate,
    pub review_time: String,
    pub admin_reply: String,
    pub admin_reply_date: Option<NaiveDate>,
    pub admin_reply_time: Option<String>,
    /// RFC 3339.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub activity_id: String,
    pub activity_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub rating: u8,
    pub comment: String,
    pub tags: Vec<String>,
    pub review_date: NaiveDate,
    pub review_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewFilter {
    /// Case-insensitive match over comment, customer and activity names.
    pub search: Option<String>,
    pub rating: Option<u8>,
    pub activity_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStatistics {
    pub total: u32,
    /// Mean rating rounded to one decimal; 0.0 with no reviews.
    pub average_rating: f64,
    pub replied: u32,
    /// Rounded percent of reviews carrying an admin reply.
    pub reply_rate: u32,
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Stored announcement status. "Expired" is never stored; it is derived
/// from `expiry_date` at filter time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Draft,
    Published,
}

/// Status values a filter can ask for, including the derived one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatusFilter {
    Draft,
    Published,
    Expired,
}

/// Date-range presets for announcement filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateRangeFilter {
    /// Published today.
    Today,
    /// Published within the last 7 days.
    Week,
    /// Published within the last 30 days.
    Month,
    Custom {
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Recipient group key (`all`, `members`, ...), compared as stored.
    pub send_to: String,
    pub image: Option<String>,
    pub priority: Priority,
    pub expiry_date: Option<NaiveDate>,
    pub status: AnnouncementStatus,
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339; set when the announcement was published.
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub send_to: String,
    pub image: Option<String>,
    pub priority: Priority,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub send_to: Option<String>,
    pub image: Option<String>,
    pub priority: Option<Priority>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementFilter {
    /// Case-insensitive match over title and content.
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<AnnouncementStatusFilter>,
    pub recipients: Option<String>,
    pub date_range: Option<DateRangeFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementStatistics {
    pub total: u32,
    pub published: u32,
    pub drafts: u32,
    pub expired: u32,
}
