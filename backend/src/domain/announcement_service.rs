//! Announcement service: publishing, drafts, and expiry-aware
//! filtering.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::info;

use shared::{
    generate_record_id, Announcement, AnnouncementFilter, AnnouncementStatistics,
    AnnouncementStatus, AnnouncementStatusFilter, CreateAnnouncementRequest, DateRangeFilter,
    UpdateAnnouncementRequest,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{AnnouncementStorage, Connection};

pub struct AnnouncementService<C: Connection> {
    announcements: C::Announcements,
}

impl<C: Connection> AnnouncementService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            announcements: connection.announcements(),
        }
    }

    /// Create and publish in one step, stamping `published_at`.
    pub fn publish_announcement(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        let announcement = self.build(request, AnnouncementStatus::Published)?;
        self.announcements.upsert(&announcement)?;
        info!("Published announcement {} ({})", announcement.title, announcement.id);
        Ok(announcement)
    }

    /// Create without publishing.
    pub fn save_draft(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        let announcement = self.build(request, AnnouncementStatus::Draft)?;
        self.announcements.upsert(&announcement)?;
        info!("Saved announcement draft {} ({})", announcement.title, announcement.id);
        Ok(announcement)
    }

    fn build(
        &self,
        request: CreateAnnouncementRequest,
        status: AnnouncementStatus,
    ) -> Result<Announcement> {
        if request.title.trim().is_empty()
            || request.content.trim().is_empty()
            || request.send_to.trim().is_empty()
        {
            return Err(validation("Please fill in all required fields!"));
        }

        let now = Utc::now();
        Ok(Announcement {
            id: generate_record_id(now.timestamp_millis()),
            title: request.title.trim().to_string(),
            content: request.content.trim().to_string(),
            send_to: request.send_to.trim().to_string(),
            image: request.image,
            priority: request.priority,
            expiry_date: request.expiry_date,
            status,
            created_at: now.to_rfc3339(),
            published_at: match status {
                AnnouncementStatus::Published => Some(now.to_rfc3339()),
                AnnouncementStatus::Draft => None,
            },
        })
    }

    /// Publish an existing draft in place.
    pub fn publish_draft(&self, id: &str) -> Result<Announcement> {
        let mut announcement = self
            .announcements
            .get(id)?
            .ok_or_else(|| not_found("Announcement", id))?;

        announcement.status = AnnouncementStatus::Published;
        announcement.published_at = Some(Utc::now().to_rfc3339());
        self.announcements.upsert(&announcement)?;
        info!("Published draft {}", announcement.id);
        Ok(announcement)
    }

    pub fn update_announcement(
        &self,
        id: &str,
        patch: UpdateAnnouncementRequest,
    ) -> Result<Announcement> {
        let mut announcement = self
            .announcements
            .get(id)?
            .ok_or_else(|| not_found("Announcement", id))?;

        if let Some(title) = patch.title {
            announcement.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            announcement.content = content.trim().to_string();
        }
        if let Some(send_to) = patch.send_to {
            announcement.send_to = send_to.trim().to_string();
        }
        if let Some(image) = patch.image {
            announcement.image = Some(image);
        }
        if let Some(priority) = patch.priority {
            announcement.priority = priority;
        }
        if let Some(expiry_date) = patch.expiry_date {
            announcement.expiry_date = Some(expiry_date);
        }

        self.announcements.upsert(&announcement)?;
        info!("Updated announcement {}", announcement.id);
        Ok(announcement)
    }

    pub fn delete_announcement(&self, id: &str) -> Result<bool> {
        self.announcements.delete(id)
    }

    pub fn get_announcement(&self, id: &str) -> Result<Option<Announcement>> {
        self.announcements.get(id)
    }

    pub fn list_announcements(&self) -> Result<Vec<Announcement>> {
        self.announcements.list()
    }

    /// Linear predicate scan, order preserved from the store. The
    /// status filter sees an announcement past its expiry date as
    /// expired regardless of the stored status.
    pub fn filtered_announcements(&self, filter: &AnnouncementFilter) -> Result<Vec<Announcement>> {
        self.filtered_at(filter, Utc::now().date_naive())
    }

    fn filtered_at(
        &self,
        filter: &AnnouncementFilter,
        today: NaiveDate,
    ) -> Result<Vec<Announcement>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        Ok(self
            .announcements
            .list()?
            .into_iter()
            .filter(|announcement| {
                if let Some(ref query) = search {
                    let haystack =
                        format!("{} {}", announcement.title, announcement.content).to_lowercase();
                    if !haystack.contains(query) {
                        return false;
                    }
                }
                if let Some(priority) = filter.priority {
                    if announcement.priority != priority {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if effective_status(announcement, today) != status {
                        return false;
                    }
                }
                if let Some(ref recipients) = filter.recipients {
                    if &announcement.send_to != recipients {
                        return false;
                    }
                }
                if let Some(ref range) = filter.date_range {
                    if !in_date_range(announcement, range, today) {
                        return false;
                    }
                }
                true
            })
            .collect())
    }

    pub fn statistics(&self) -> Result<AnnouncementStatistics> {
        let today = Utc::now().date_naive();
        let announcements = self.announcements.list()?;

        let expired = announcements
            .iter()
            .filter(|a| is_expired(a, today))
            .count() as u32;
        let published = announcements
            .iter()
            .filter(|a| a.status == AnnouncementStatus::Published && !is_expired(a, today))
            .count() as u32;
        let drafts = announcements
            .iter()
            .filter(|a| a.status == AnnouncementStatus::Draft)
            .count() as u32;

        Ok(AnnouncementStatistics {
            total: announcements.len() as u32,
            published,
            drafts,
            expired,
        })
    }
}

fn is_expired(announcement: &Announcement, today: NaiveDate) -> bool {
    announcement
        .expiry_date
        .map(|expiry| expiry <= today)
        .unwrap_or(false)
}

fn effective_status(announcement: &Announcement, today: NaiveDate) -> AnnouncementStatusFilter {
    if is_expired(announcement, today) {
        AnnouncementStatusFilter::Expired
    } else {
        match announcement.status {
            AnnouncementStatus::Draft => AnnouncementStatusFilter::Draft,
            AnnouncementStatus::Published => AnnouncementStatusFilter::Published,
        }
    }
}

/// Date-range presets compare against the publication date, falling
/// back to the creation date for drafts.
fn in_date_range(announcement: &Announcement, range: &DateRangeFilter, today: NaiveDate) -> bool {
    let stamp = announcement
        .published_at
        .as_deref()
        .unwrap_or(&announcement.created_at);
    let Ok(date) = chrono::DateTime::parse_from_rfc3339(stamp).map(|d| d.date_naive()) else {
        return false;
    };

    match range {
        DateRangeFilter::Today => date == today,
        DateRangeFilter::Week => date >= today - chrono::Duration::days(7),
        DateRangeFilter::Month => date >= today - chrono::Duration::days(30),
        DateRangeFilter::Custom {
            start_date,
            end_date,
        } => {
            if let Some(start) = start_date {
                if date < *start {
                    return false;
                }
            }
            if let Some(end) = end_date {
                if date > *end {
                    return false;
                }
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::JsonConnection;
    use shared::Priority;
    use tempfile::TempDir;

    fn setup() -> (AnnouncementService<JsonConnection>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (AnnouncementService::new(&connection), temp_dir)
    }

    fn request(title: &str, priority: Priority) -> CreateAnnouncementRequest {
        CreateAnnouncementRequest {
            title: title.to_string(),
            content: "Details inside".to_string(),
            send_to: "all".to_string(),
            image: None,
            priority,
            expiry_date: None,
        }
    }

    #[test]
    fn priority_filter_keeps_only_matches_in_source_order() {
        let (service, _temp_dir) = setup();
        service
            .publish_announcement(request("First high", Priority::High))
            .unwrap();
        service
            .publish_announcement(request("Low note", Priority::Low))
            .unwrap();
        service
            .publish_announcement(request("Second high", Priority::High))
            .unwrap();

        let high = service
            .filtered_announcements(&AnnouncementFilter {
                priority: Some(Priority::High),
                ..Default::default()
            })
            .unwrap();

        let titles: Vec<&str> = high.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["First high", "Second high"]);
    }

    #[test]
    fn past_expiry_reads_as_expired_in_the_status_filter() {
        let (service, _temp_dir) = setup();

        let mut expiring = request("Closing soon", Priority::Medium);
        expiring.expiry_date = Some("2020-01-01".parse().unwrap());
        service.publish_announcement(expiring).unwrap();
        service
            .publish_announcement(request("Evergreen", Priority::Medium))
            .unwrap();

        let expired = service
            .filtered_announcements(&AnnouncementFilter {
                status: Some(AnnouncementStatusFilter::Expired),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].title, "Closing soon");
        // The stored status never flips to expired.
        assert_eq!(expired[0].status, AnnouncementStatus::Published);

        let published = service
            .filtered_announcements(&AnnouncementFilter {
                status: Some(AnnouncementStatusFilter::Published),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "Evergreen");
    }

    #[test]
    fn drafts_have_no_publication_stamp_until_published() {
        let (service, _temp_dir) = setup();

        let draft = service
            .save_draft(request("Draft note", Priority::Low))
            .unwrap();
        assert_eq!(draft.status, AnnouncementStatus::Draft);
        assert!(draft.published_at.is_none());

        let published = service.publish_draft(&draft.id).unwrap();
        assert_eq!(published.status, AnnouncementStatus::Published);
        assert!(published.published_at.is_some());
    }

    #[test]
    fn custom_date_range_bounds_are_inclusive() {
        let (service, _temp_dir) = setup();
        service
            .publish_announcement(request("Note", Priority::Medium))
            .unwrap();

        let today = Utc::now().date_naive();
        let inside = service
            .filtered_at(
                &AnnouncementFilter {
                    date_range: Some(DateRangeFilter::Custom {
                        start_date: Some(today),
                        end_date: Some(today),
                    }),
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(inside.len(), 1);

        let outside = service
            .filtered_at(
                &AnnouncementFilter {
                    date_range: Some(DateRangeFilter::Custom {
                        start_date: Some(today + chrono::Duration::days(1)),
                        end_date: None,
                    }),
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert!(outside.is_empty());
    }

    #[test]
    fn update_preserves_unpatched_fields() {
        let (service, _temp_dir) = setup();
        let announcement = service
            .publish_announcement(request("Original", Priority::High))
            .unwrap();

        let updated = service
            .update_announcement(
                &announcement.id,
                UpdateAnnouncementRequest {
                    content: Some("Amended details".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.content, "Amended details");
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.published_at, announcement.published_at);
    }

    #[test]
    fn statistics_split_published_drafts_and_expired() {
        let (service, _temp_dir) = setup();

        service
            .publish_announcement(request("Live", Priority::High))
            .unwrap();
        service.save_draft(request("Pending", Priority::Low)).unwrap();
        let mut old = request("Old", Priority::Low);
        old.expiry_date = Some("2020-01-01".parse().unwrap());
        service.publish_announcement(old).unwrap();

        let stats = service.statistics().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.drafts, 1);
        assert_eq!(stats.expired, 1);
    }
}
