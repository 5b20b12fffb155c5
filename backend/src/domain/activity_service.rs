//! Activity service: the single mediator between activity-editing
//! callers and the persisted activity store.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};

use shared::{
    derive_time_views, generate_record_id, Activity, ActivityDraft, ActivityStatistics,
    ActivityStatus, ActivitySummary, CreateActivityRequest, TimeSlot, TimeSlotStatus,
    UpdateActivityRequest, PLACEHOLDER_IMAGE_URL,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{ActivityStorage, Connection, SessionStorage};

pub struct ActivityService<C: Connection> {
    activities: C::Activities,
    session: C::Session,
}

impl<C: Connection> ActivityService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            activities: connection.activities(),
            session: connection.session(),
        }
    }

    /// List all activities in stored order.
    pub fn list_activities(&self) -> Result<Vec<Activity>> {
        self.activities.list()
    }

    /// Look up one activity. An absent id is `None`, not an error.
    pub fn get_activity(&self, id: &str) -> Result<Option<Activity>> {
        self.activities.get(id)
    }

    /// Create a new activity with a fresh timestamp id, normalized
    /// image, and the `times` view derived from its slots.
    pub fn create_activity(&self, request: CreateActivityRequest) -> Result<Activity> {
        info!("Creating activity: name={}", request.name);

        self.validate_create_request(&request)?;

        let times = derive_time_views(&request.time_slots);
        let activity = Activity {
            id: generate_record_id(Utc::now().timestamp_millis()),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            activity_type: request.activity_type.trim().to_string(),
            capacity: request.capacity,
            duration_minutes: request.duration_minutes,
            image: normalize_image(request.image),
            status: ActivityStatus::Active,
            current_bookings: 0,
            time_slots: request.time_slots,
            times,
        };

        self.activities.upsert(&activity)?;
        info!("Created activity {} ({})", activity.name, activity.id);
        Ok(activity)
    }

    /// Merge a field-wise patch into an existing activity. Fields absent
    /// from the patch are preserved; supplying `time_slots` re-derives
    /// the `times` view, otherwise the prior view stands. Last writer
    /// wins.
    pub fn update_activity(&self, id: &str, patch: UpdateActivityRequest) -> Result<Activity> {
        info!("Updating activity: {}", id);

        let mut activity = self
            .activities
            .get(id)?
            .ok_or_else(|| not_found("Activity", id))?;

        if let Some(ref slots) = patch.time_slots {
            validate_time_slots(slots)?;
        }

        if let Some(name) = patch.name {
            activity.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            activity.description = description.trim().to_string();
        }
        if let Some(activity_type) = patch.activity_type {
            activity.activity_type = activity_type.trim().to_string();
        }
        if let Some(capacity) = patch.capacity {
            activity.capacity = capacity;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            activity.duration_minutes = duration_minutes;
        }
        if let Some(image) = patch.image {
            activity.image = normalize_image(Some(image));
        }
        if let Some(status) = patch.status {
            activity.status = status;
        }
        if let Some(time_slots) = patch.time_slots {
            activity.times = derive_time_views(&time_slots);
            activity.time_slots = time_slots;
        }

        self.activities.upsert(&activity)?;
        info!("Updated activity {} ({})", activity.name, activity.id);
        Ok(activity)
    }

    /// Delete by id. Returns false for an absent id, with the store
    /// untouched.
    pub fn delete_activity(&self, id: &str) -> Result<bool> {
        let removed = self.activities.delete(id)?;
        if removed {
            info!("Deleted activity {}", id);
        } else {
            warn!("Delete requested for unknown activity {}", id);
        }
        Ok(removed)
    }

    /// Replace the store with the built-in sample records.
    pub fn reset_to_sample_data(&self) -> Result<Vec<Activity>> {
        let samples = sample_activities();
        self.activities.replace_all(&samples)?;
        info!("Activity store reset to {} sample records", samples.len());
        Ok(samples)
    }

    /// Dashboard projection of every activity.
    pub fn dashboard_activities(&self) -> Result<Vec<ActivitySummary>> {
        Ok(self
            .activities
            .list()?
            .iter()
            .map(activity_for_dashboard)
            .collect())
    }

    /// Edit-form projection of one activity.
    pub fn activity_for_edit(&self, id: &str) -> Result<Option<ActivityDraft>> {
        Ok(self.activities.get(id)?.map(|activity| ActivityDraft {
            activity_type: activity.activity_type,
            name: activity.name,
            description: activity.description,
            image: activity.image,
            time_slots: activity.time_slots,
        }))
    }

    /// Aggregate numbers for the dashboard header.
    pub fn statistics(&self) -> Result<ActivityStatistics> {
        let activities = self.activities.list()?;

        let total_bookings: u32 = activities.iter().map(|a| a.current_bookings).sum();
        let total_capacity: u32 = activities.iter().map(|a| a.capacity).sum();
        let active_activities = activities
            .iter()
            .filter(|a| a.status == ActivityStatus::Active)
            .count() as u32;
        let occupancy_rate = if total_capacity > 0 {
            ((total_bookings as f64 / total_capacity as f64) * 100.0).round() as u32
        } else {
            0
        };

        Ok(ActivityStatistics {
            total_bookings,
            active_activities,
            total_capacity,
            occupancy_rate,
        })
    }

    // -- edit-mode handoff ---------------------------------------------

    /// Park an activity id for the class editor to pick up.
    pub fn begin_editing(&self, id: &str) -> Result<()> {
        self.session.set_editing_activity(id)
    }

    /// The id parked by `begin_editing`, if any.
    pub fn editing_activity_id(&self) -> Result<Option<String>> {
        self.session.editing_activity()
    }

    pub fn clear_editing(&self) -> Result<()> {
        self.session.clear_editing_activity()
    }

    pub fn is_edit_mode(&self) -> Result<bool> {
        Ok(self.session.editing_activity()?.is_some())
    }

    // -- validation ----------------------------------------------------

    fn validate_create_request(&self, request: &CreateActivityRequest) -> Result<()> {
        if request.name.trim().is_empty()
            || request.description.trim().is_empty()
            || request.activity_type.trim().is_empty()
        {
            return Err(validation("Please fill in all required fields!"));
        }
        if request.capacity < 1 {
            return Err(validation("Capacity must be at least 1"));
        }
        if request.duration_minutes < 1 {
            return Err(validation("Duration must be at least 1 minute"));
        }
        if request.time_slots.is_empty() {
            return Err(validation("Please add at least one time slot"));
        }
        validate_time_slots(&request.time_slots)
    }
}

/// Per-slot rules plus duplicate date+time rejection, shared between
/// create and update.
fn validate_time_slots(slots: &[TimeSlot]) -> Result<()> {
    for slot in slots {
        if slot.capacity < 1 {
            return Err(validation("Capacity must be at least 1"));
        }
        if slot.price < 0.0 {
            return Err(validation("Price cannot be negative"));
        }
        if slot.duration_minutes < 1 {
            return Err(validation("Duration must be at least 1 minute"));
        }
    }

    for (i, slot) in slots.iter().enumerate() {
        let duplicate = slots[..i]
            .iter()
            .any(|other| other.date == slot.date && other.time == slot.time);
        if duplicate {
            return Err(validation("This date and time already exists"));
        }
    }

    Ok(())
}

/// Pure dashboard projection.
pub fn activity_for_dashboard(activity: &Activity) -> ActivitySummary {
    ActivitySummary {
        id: activity.id.clone(),
        name: activity.name.clone(),
        description: activity.description.clone(),
        capacity: activity.capacity,
        current_bookings: activity.current_bookings,
        duration_minutes: activity.duration_minutes,
        image: activity.image.clone(),
        times: activity.times.clone(),
        status: activity.status,
        activity_type: activity.activity_type.clone(),
    }
}

fn normalize_image(image: Option<String>) -> String {
    match image {
        Some(s) if !s.trim().is_empty() => s,
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

fn sample_slot(date: &str, time: &str, status: TimeSlotStatus) -> TimeSlot {
    TimeSlot {
        date: date.parse().expect("sample slot date"),
        time: time.to_string(),
        capacity: 8,
        price: 0.0,
        duration_minutes: 120,
        status,
    }
}

/// The two records the store is reset to.
fn sample_activities() -> Vec<Activity> {
    let build = |id: &str, name: &str, description: &str| {
        let time_slots = vec![
            sample_slot("2025-09-16", "18:32", TimeSlotStatus::Active),
            sample_slot("2025-10-02", "18:33", TimeSlotStatus::Active),
            sample_slot("2025-09-18", "18:33", TimeSlotStatus::Closed),
        ];
        let times = derive_time_views(&time_slots);
        Activity {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            activity_type: "yoga".to_string(),
            capacity: 8,
            duration_minutes: 120,
            image: PLACEHOLDER_IMAGE_URL.to_string(),
            status: ActivityStatus::Active,
            current_bookings: 0,
            time_slots,
            times,
        }
    };

    vec![
        build("1", "Yoga - Beginner", "Entry-level yoga session"),
        build("2", "Yoga - Evening Flow", "Relaxed evening yoga session"),
    ]
}
