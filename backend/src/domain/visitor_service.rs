//! Visitor records service.
//!
//! Registered visitors must carry real contact details; unregistered
//! ones are recorded as guests with placeholder identity.

use anyhow::Result;
use chrono::Utc;
use log::info;

use shared::{
    generate_record_id, CreateVisitorRequest, UpdateVisitorRequest, Visitor, VisitorFilter,
    VisitorStatistics, VisitorType,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{Connection, VisitorStorage};

/// Identity recorded for unregistered visits.
const GUEST_NAME: &str = "Guest User";
const GUEST_EMAIL: &str = "Unknown";

pub struct VisitorService<C: Connection> {
    visitors: C::Visitors,
}

impl<C: Connection> VisitorService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            visitors: connection.visitors(),
        }
    }

    pub fn record_visit(&self, request: CreateVisitorRequest) -> Result<Visitor> {
        if request.source.trim().is_empty() || request.visit_time.trim().is_empty() {
            return Err(validation("Please fill in all required fields!"));
        }

        let (name, email) = match request.visitor_type {
            VisitorType::Registered => {
                let name = request.name.as_deref().unwrap_or("").trim().to_string();
                let email = request.email.as_deref().unwrap_or("").trim().to_string();
                if name.is_empty() || email.is_empty() {
                    return Err(validation(
                        "Please fill in name and email for registered visitors!",
                    ));
                }
                (name, email)
            }
            VisitorType::Unregistered => (GUEST_NAME.to_string(), GUEST_EMAIL.to_string()),
        };

        let visitor = Visitor {
            id: generate_record_id(Utc::now().timestamp_millis()),
            name,
            email,
            visitor_type: request.visitor_type,
            source: request.source.trim().to_string(),
            visit_date: request.visit_date,
            visit_time: request.visit_time,
            notes: request.notes.trim().to_string(),
        };

        self.visitors.upsert(&visitor)?;
        info!("Recorded visit {} ({})", visitor.id, visitor.name);
        Ok(visitor)
    }

    pub fn update_visitor(&self, id: &str, patch: UpdateVisitorRequest) -> Result<Visitor> {
        let mut visitor = self
            .visitors
            .get(id)?
            .ok_or_else(|| not_found("Visitor", id))?;

        if let Some(name) = patch.name {
            visitor.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            visitor.email = email.trim().to_string();
        }
        if let Some(visitor_type) = patch.visitor_type {
            visitor.visitor_type = visitor_type;
            if visitor_type == VisitorType::Unregistered {
                visitor.name = GUEST_NAME.to_string();
                visitor.email = GUEST_EMAIL.to_string();
            }
        }
        if let Some(source) = patch.source {
            visitor.source = source.trim().to_string();
        }
        if let Some(visit_date) = patch.visit_date {
            visitor.visit_date = visit_date;
        }
        if let Some(visit_time) = patch.visit_time {
            visitor.visit_time = visit_time;
        }
        if let Some(notes) = patch.notes {
            visitor.notes = notes.trim().to_string();
        }

        self.visitors.upsert(&visitor)?;
        info!("Updated visitor {}", visitor.id);
        Ok(visitor)
    }

    pub fn delete_visitor(&self, id: &str) -> Result<bool> {
        self.visitors.delete(id)
    }

    pub fn get_visitor(&self, id: &str) -> Result<Option<Visitor>> {
        self.visitors.get(id)
    }

    pub fn list_visitors(&self) -> Result<Vec<Visitor>> {
        self.visitors.list()
    }

    /// Linear predicate scan, order preserved from the store.
    pub fn filtered_visitors(&self, filter: &VisitorFilter) -> Result<Vec<Visitor>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        Ok(self
            .visitors
            .list()?
            .into_iter()
            .filter(|visitor| {
                if let Some(ref query) = search {
                    let haystack =
                        format!("{} {} {}", visitor.name, visitor.email, visitor.notes)
                            .to_lowercase();
                    if !haystack.contains(query) {
                        return false;
                    }
                }
                if let Some(visitor_type) = filter.visitor_type {
                    if visitor.visitor_type != visitor_type {
                        return false;
                    }
                }
                if let Some(ref source) = filter.source {
                    if &visitor.source != source {
                        return false;
                    }
                }
                if let Some(date) = filter.date {
                    if visitor.visit_date != date {
                        return false;
                    }
                }
                true
            })
            .collect())
    }

    pub fn statistics(&self) -> Result<VisitorStatistics> {
        let visitors = self.visitors.list()?;
        let registered = visitors
            .iter()
            .filter(|v| v.visitor_type == VisitorType::Registered)
            .count() as u32;

        Ok(VisitorStatistics {
            total: visitors.len() as u32,
            registered,
            unregistered: visitors.len() as u32 - registered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::JsonConnection;
    use tempfile::TempDir;

    fn setup() -> (VisitorService<JsonConnection>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (VisitorService::new(&connection), temp_dir)
    }

    fn registered(name: &str) -> CreateVisitorRequest {
        CreateVisitorRequest {
            name: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            visitor_type: VisitorType::Registered,
            source: "website".to_string(),
            visit_date: "2025-09-16".parse().unwrap(),
            visit_time: "14:00".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn unregistered_visits_get_guest_identity() {
        let (service, _temp_dir) = setup();

        let visitor = service
            .record_visit(CreateVisitorRequest {
                name: None,
                email: None,
                visitor_type: VisitorType::Unregistered,
                source: "walk_in".to_string(),
                visit_date: "2025-09-16".parse().unwrap(),
                visit_time: "15:30".to_string(),
                notes: String::new(),
            })
            .unwrap();

        assert_eq!(visitor.name, "Guest User");
        assert_eq!(visitor.email, "Unknown");
    }

    #[test]
    fn registered_visits_require_name_and_email() {
        let (service, _temp_dir) = setup();

        let mut missing = registered("Alice");
        missing.email = None;
        let err = service.record_visit(missing).unwrap_err();
        assert!(err.to_string().contains("registered visitors"));
        assert!(service.list_visitors().unwrap().is_empty());
    }

    #[test]
    fn filters_narrow_by_type_source_and_date() {
        let (service, _temp_dir) = setup();

        service.record_visit(registered("Alice")).unwrap();
        let mut referral = registered("Bob");
        referral.source = "referral".to_string();
        referral.visit_date = "2025-09-17".parse().unwrap();
        service.record_visit(referral).unwrap();

        let by_source = service
            .filtered_visitors(&VisitorFilter {
                source: Some("referral".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_source.len(), 1);
        assert_eq!(by_source[0].name, "Bob");

        let by_date = service
            .filtered_visitors(&VisitorFilter {
                date: Some("2025-09-16".parse().unwrap()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].name, "Alice");

        let stats = service.statistics().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.registered, 2);
        assert_eq!(stats.unregistered, 0);
    }
}
