use anyhow::Result;
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use shared::{
    derive_time_views, Activity, ActivityStatus, TimeSlot, TimeSlotStatus, PLACEHOLDER_IMAGE_URL,
};

use super::connection::JsonConnection;
use crate::storage::traits::ActivityStorage;

const STORE_FILE: &str = "activities.json";

/// Fallback activity type when a record never carried one.
const DEFAULT_ACTIVITY_TYPE: &str = "yoga";

/// JSON-file activity repository, and the single place legacy record
/// shapes are folded into the unified schema.
///
/// The store historically accumulated two spellings of the same data
/// (`className`/`name`, `activityType`/`type`, authored `times` next to
/// `timeSlots`). Records are normalized once, on load; everything
/// written back out is the unified shape with `times` re-derived from
/// `time_slots`.
#[derive(Clone)]
pub struct ActivityRepository {
    connection: JsonConnection,
}

/// Legacy-tolerant raw record. Field spellings from every generation of
/// the store deserialize into it; `normalize` decides which wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawActivity {
    /// Old records carry numeric ids, newer ones strings.
    id: Option<Value>,
    name: Option<String>,
    #[serde(rename = "className")]
    class_name: Option<String>,
    description: Option<String>,
    #[serde(alias = "activityType")]
    activity_type: Option<String>,
    #[serde(rename = "type")]
    type_field: Option<String>,
    capacity: Option<u32>,
    #[serde(alias = "duration")]
    duration_minutes: Option<u32>,
    /// Anything that is not a string becomes the placeholder URL.
    image: Option<Value>,
    status: Option<ActivityStatus>,
    #[serde(alias = "currentBookings")]
    current_bookings: Option<u32>,
    #[serde(alias = "timeSlots")]
    time_slots: Option<Vec<RawTimeSlot>>,
    times: Option<Vec<RawTimeView>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTimeSlot {
    date: Option<NaiveDate>,
    time: Option<String>,
    capacity: Option<u32>,
    price: Option<f64>,
    #[serde(alias = "duration")]
    duration_minutes: Option<u32>,
    status: Option<TimeSlotStatus>,
}

/// Authored `times` entry from records that predate `timeSlots`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTimeView {
    /// `YYYY-MM-DD HH:MM`
    date: Option<String>,
    available: bool,
    capacity: Option<u32>,
    #[serde(alias = "duration")]
    duration_minutes: Option<u32>,
}

impl ActivityRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    /// Load the store, normalizing each record and skipping ones that
    /// cannot be made sense of.
    fn read_all(&self) -> Result<Vec<Activity>> {
        let raw_records: Vec<Value> = self.connection.read_array(STORE_FILE)?;

        let mut activities = Vec::with_capacity(raw_records.len());
        for record in raw_records {
            let raw: RawActivity = match serde_json::from_value(record) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("skipping unreadable activity record: {}", e);
                    continue;
                }
            };
            match normalize(raw) {
                Some(activity) => activities.push(activity),
                None => warn!("skipping activity record without an id"),
            }
        }

        Ok(activities)
    }

    fn write_all(&self, activities: &[Activity]) -> Result<()> {
        self.connection.write_array(STORE_FILE, activities)
    }
}

/// Fold one raw record into the unified shape. Returns None when the
/// record has no usable id.
fn normalize(raw: RawActivity) -> Option<Activity> {
    let id = match raw.id? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => {
            warn!("activity id has unusable shape: {}", other);
            return None;
        }
    };

    let capacity = raw.capacity.unwrap_or(0);
    let duration_minutes = raw.duration_minutes.unwrap_or(0);

    let time_slots = match (raw.time_slots, raw.times) {
        (Some(slots), _) => normalize_slots(slots, capacity, duration_minutes),
        (None, Some(times)) => slots_from_views(times, capacity, duration_minutes),
        (None, None) => Vec::new(),
    };

    let image = match raw.image {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    };

    let times = derive_time_views(&time_slots);

    Some(Activity {
        id,
        name: raw.class_name.or(raw.name).unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        activity_type: raw
            .activity_type
            .or(raw.type_field)
            .unwrap_or_else(|| DEFAULT_ACTIVITY_TYPE.to_string()),
        capacity,
        duration_minutes,
        image,
        status: raw.status.unwrap_or(ActivityStatus::Active),
        current_bookings: raw.current_bookings.unwrap_or(0),
        time_slots,
        times,
    })
}

fn normalize_slots(slots: Vec<RawTimeSlot>, capacity: u32, duration: u32) -> Vec<TimeSlot> {
    slots
        .into_iter()
        .filter_map(|slot| {
            let (date, time) = match (slot.date, slot.time) {
                (Some(date), Some(time)) => (date, time),
                _ => {
                    warn!("skipping time slot without a date and time");
                    return None;
                }
            };
            Some(TimeSlot {
                date,
                time,
                capacity: slot.capacity.unwrap_or(capacity),
                price: slot.price.unwrap_or(0.0),
                duration_minutes: slot.duration_minutes.unwrap_or(duration),
                status: slot.status.unwrap_or(TimeSlotStatus::Active),
            })
        })
        .collect()
}

/// Reconstruct slots from an authored `times` list: split the combined
/// date string, mark available entries active and the rest closed.
fn slots_from_views(views: Vec<RawTimeView>, capacity: u32, duration: u32) -> Vec<TimeSlot> {
    views
        .into_iter()
        .filter_map(|view| {
            let combined = view.date?;
            let (date_part, time_part) = combined.split_once(' ')?;
            let date: NaiveDate = match date_part.parse() {
                Ok(date) => date,
                Err(_) => {
                    warn!("skipping times entry with unparseable date: {}", combined);
                    return None;
                }
            };
            Some(TimeSlot {
                date,
                time: time_part.to_string(),
                capacity: view.capacity.unwrap_or(capacity),
                price: 0.0,
                duration_minutes: view.duration_minutes.unwrap_or(duration),
                status: if view.available {
                    TimeSlotStatus::Active
                } else {
                    TimeSlotStatus::Closed
                },
            })
        })
        .collect()
}

impl ActivityStorage for ActivityRepository {
    fn get(&self, id: &str) -> Result<Option<Activity>> {
        Ok(self.read_all()?.into_iter().find(|a| a.id == id))
    }

    fn upsert(&self, activity: &Activity) -> Result<()> {
        let mut activities = self.read_all()?;
        match activities.iter_mut().find(|a| a.id == activity.id) {
            Some(existing) => *existing = activity.clone(),
            None => activities.push(activity.clone()),
        }
        self.write_all(&activities)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let activities = self.read_all()?;
        let before = activities.len();
        let remaining: Vec<Activity> = activities.into_iter().filter(|a| a.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }
        self.write_all(&remaining)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Activity>> {
        self.read_all()
    }

    fn replace_all(&self, activities: &[Activity]) -> Result<()> {
        self.write_all(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (ActivityRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (ActivityRepository::new(connection), temp_dir)
    }

    fn sample_activity(id: &str) -> Activity {
        let time_slots = vec![TimeSlot {
            date: "2025-09-16".parse().unwrap(),
            time: "18:32".to_string(),
            capacity: 8,
            price: 0.0,
            duration_minutes: 120,
            status: TimeSlotStatus::Active,
        }];
        let times = derive_time_views(&time_slots);
        Activity {
            id: id.to_string(),
            name: "Yoga - Beginner".to_string(),
            description: "Entry-level yoga class".to_string(),
            activity_type: "yoga".to_string(),
            capacity: 8,
            duration_minutes: 120,
            image: PLACEHOLDER_IMAGE_URL.to_string(),
            status: ActivityStatus::Active,
            current_bookings: 0,
            time_slots,
            times,
        }
    }

    #[test]
    fn upsert_and_get_round_trip() {
        let (repo, _temp_dir) = setup();
        let activity = sample_activity("1757000000000");

        repo.upsert(&activity).unwrap();
        let loaded = repo.get("1757000000000").unwrap().unwrap();
        assert_eq!(loaded, activity);

        // Upserting again with changed fields replaces, not appends.
        let mut changed = activity.clone();
        changed.description = "Updated".to_string();
        repo.upsert(&changed).unwrap();
        assert_eq!(repo.list().unwrap().len(), 1);
        assert_eq!(repo.get("1757000000000").unwrap().unwrap().description, "Updated");
    }

    #[test]
    fn delete_absent_id_leaves_store_unchanged() {
        let (repo, _temp_dir) = setup();
        repo.upsert(&sample_activity("1")).unwrap();

        assert!(!repo.delete("999").unwrap());
        assert_eq!(repo.list().unwrap().len(), 1);
        assert!(repo.delete("1").unwrap());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn legacy_camel_case_records_normalize_on_load() {
        let (repo, temp_dir) = setup();

        let legacy = r#"[
            {
                "id": 1,
                "name": "Old Name",
                "className": "Yoga - Morning",
                "description": "legacy record",
                "capacity": 8,
                "currentBookings": 2,
                "duration": 120,
                "type": "yoga",
                "activityType": "yoga",
                "status": "active",
                "image": null,
                "timeSlots": [
                    { "date": "2025-09-16", "time": "18:32", "capacity": 8, "price": 0, "duration": 120, "status": "active" },
                    { "date": "2025-09-18", "time": "18:33", "capacity": 8, "price": 0, "duration": 120, "status": "closed" }
                ]
            }
        ]"#;
        std::fs::write(temp_dir.path().join("activities.json"), legacy).unwrap();

        let activities = repo.list().unwrap();
        assert_eq!(activities.len(), 1);

        let activity = &activities[0];
        // Numeric id becomes a string, className wins over name.
        assert_eq!(activity.id, "1");
        assert_eq!(activity.name, "Yoga - Morning");
        assert_eq!(activity.current_bookings, 2);
        assert_eq!(activity.duration_minutes, 120);
        // Non-string image normalizes to the placeholder.
        assert_eq!(activity.image, PLACEHOLDER_IMAGE_URL);
        // The derived view reflects slot statuses.
        assert_eq!(activity.times.len(), 2);
        assert!(activity.times[0].available);
        assert!(!activity.times[1].available);
    }

    #[test]
    fn records_with_only_times_rebuild_slots() {
        let (repo, temp_dir) = setup();

        let legacy = r#"[
            {
                "id": "42",
                "name": "Weaving Workshop",
                "capacity": 6,
                "duration": 90,
                "times": [
                    { "date": "2025-10-02 10:00", "available": true },
                    { "date": "2025-10-03 10:00", "available": false }
                ]
            }
        ]"#;
        std::fs::write(temp_dir.path().join("activities.json"), legacy).unwrap();

        let activity = repo.get("42").unwrap().unwrap();
        assert_eq!(activity.time_slots.len(), 2);
        assert_eq!(activity.time_slots[0].time, "10:00");
        assert_eq!(activity.time_slots[0].capacity, 6);
        assert_eq!(activity.time_slots[0].duration_minutes, 90);
        assert_eq!(activity.time_slots[0].status, TimeSlotStatus::Active);
        assert_eq!(activity.time_slots[1].status, TimeSlotStatus::Closed);
        // Missing type falls back to the default.
        assert_eq!(activity.activity_type, "yoga");
    }

    #[test]
    fn records_without_ids_are_skipped() {
        let (repo, temp_dir) = setup();

        let contents = r#"[
            { "name": "No Id" },
            { "id": "7", "name": "Has Id", "capacity": 4, "duration": 60 }
        ]"#;
        std::fs::write(temp_dir.path().join("activities.json"), contents).unwrap();

        let activities = repo.list().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, "7");
    }
}
