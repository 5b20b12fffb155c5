//! Coach roster service.

use anyhow::Result;
use chrono::Utc;
use log::info;

use shared::{
    generate_record_id, Coach, CoachFilter, CoachStatistics, CoachStatus, CreateCoachRequest,
    UpdateCoachRequest,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{CoachStorage, Connection};

pub struct CoachService<C: Connection> {
    coaches: C::Coaches,
}

impl<C: Connection> CoachService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            coaches: connection.coaches(),
        }
    }

    pub fn create_coach(&self, request: CreateCoachRequest) -> Result<Coach> {
        info!(
            "Creating coach: {} {}",
            request.first_name, request.last_name
        );

        if request.first_name.trim().is_empty()
            || request.last_name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.phone.trim().is_empty()
            || request.specialization.trim().is_empty()
        {
            return Err(validation("Please fill in all required fields!"));
        }

        let custom_specialization =
            resolve_custom_specialization(&request.specialization, &request.custom_specialization)?;

        let coach = Coach {
            id: generate_record_id(Utc::now().timestamp_millis()),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            specialization: request.specialization.trim().to_string(),
            custom_specialization,
            status: request.status,
            bio: request.bio.trim().to_string(),
        };

        self.coaches.upsert(&coach)?;
        info!("Created coach {} ({})", coach.first_name, coach.id);
        Ok(coach)
    }

    pub fn update_coach(&self, id: &str, patch: UpdateCoachRequest) -> Result<Coach> {
        let mut coach = self
            .coaches
            .get(id)?
            .ok_or_else(|| not_found("Coach", id))?;

        if let Some(first_name) = patch.first_name {
            coach.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name {
            coach.last_name = last_name.trim().to_string();
        }
        if let Some(email) = patch.email {
            coach.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            coach.phone = phone.trim().to_string();
        }
        if let Some(specialization) = patch.specialization {
            coach.specialization = specialization.trim().to_string();
        }
        if let Some(custom_specialization) = patch.custom_specialization {
            coach.custom_specialization = custom_specialization.trim().to_string();
        }
        if let Some(status) = patch.status {
            coach.status = status;
        }
        if let Some(bio) = patch.bio {
            coach.bio = bio.trim().to_string();
        }

        // Re-check the "other" rule against the merged record.
        coach.custom_specialization =
            resolve_custom_specialization(&coach.specialization, &coach.custom_specialization)?;

        self.coaches.upsert(&coach)?;
        info!("Updated coach {}", coach.id);
        Ok(coach)
    }

    pub fn delete_coach(&self, id: &str) -> Result<bool> {
        self.coaches.delete(id)
    }

    pub fn get_coach(&self, id: &str) -> Result<Option<Coach>> {
        self.coaches.get(id)
    }

    pub fn list_coaches(&self) -> Result<Vec<Coach>> {
        self.coaches.list()
    }

    /// Linear predicate scan, order preserved from the store.
    pub fn filtered_coaches(&self, filter: &CoachFilter) -> Result<Vec<Coach>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        Ok(self
            .coaches
            .list()?
            .into_iter()
            .filter(|coach| {
                if let Some(ref query) = search {
                    let haystack = format!(
                        "{} {} {} {}",
                        coach.first_name, coach.last_name, coach.email, coach.specialization
                    )
                    .to_lowercase();
                    if !haystack.contains(query) {
                        return false;
                    }
                }
                if let Some(ref specialization) = filter.specialization {
                    if &coach.specialization != specialization {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if coach.status != status {
                        return false;
                    }
                }
                true
            })
            .collect())
    }

    pub fn statistics(&self) -> Result<CoachStatistics> {
        let coaches = self.coaches.list()?;
        let active = coaches
            .iter()
            .filter(|c| c.status == CoachStatus::Active)
            .count() as u32;

        Ok(CoachStatistics {
            total: coaches.len() as u32,
            active,
            inactive: coaches.len() as u32 - active,
        })
    }
}

/// The "other" specialization requires a custom label; any other
/// specialization drops whatever custom label was supplied.
fn resolve_custom_specialization(specialization: &str, custom: &str) -> Result<String> {
    if specialization == "other" {
        if custom.trim().is_empty() {
            return Err(validation("Please enter a custom specialization!"));
        }
        Ok(custom.trim().to_string())
    } else {
        Ok(String::new())
    }
}
