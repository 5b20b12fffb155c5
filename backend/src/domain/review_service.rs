//! Customer review service: listing, filtering, and admin replies.

use anyhow::Result;
use chrono::Utc;
use log::info;

use shared::{
    generate_record_id, CreateReviewRequest, Review, ReviewFilter, ReviewStatistics,
};

use crate::error::{not_found, validation};
use crate::storage::traits::{Connection, ReviewStorage};

pub struct ReviewService<C: Connection> {
    reviews: C::Reviews,
}

impl<C: Connection> ReviewService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            reviews: connection.reviews(),
        }
    }

    pub fn create_review(&self, request: CreateReviewRequest) -> Result<Review> {
        if request.customer_name.trim().is_empty()
            || request.activity_name.trim().is_empty()
            || request.comment.trim().is_empty()
        {
            return Err(validation("Please fill in all required fields!"));
        }
        if !(1..=5).contains(&request.rating) {
            return Err(validation("Rating must be between 1 and 5"));
        }

        let review = Review {
            id: generate_record_id(Utc::now().timestamp_millis()),
            activity_id: request.activity_id,
            activity_name: request.activity_name.trim().to_string(),
            customer_name: request.customer_name.trim().to_string(),
            customer_email: request.customer_email.trim().to_string(),
            rating: request.rating,
            comment: request.comment.trim().to_string(),
            tags: request.tags,
            review_date: request.review_date,
            review_time: request.review_time,
            admin_reply: String::new(),
            admin_reply_date: None,
            admin_reply_time: None,
            created_at: Utc::now().to_rfc3339(),
        };

        self.reviews.upsert(&review)?;
        info!("Created review {} for {}", review.id, review.activity_name);
        Ok(review)
    }

    /// Attach or replace the admin reply, stamping the reply date and
    /// time.
    pub fn reply(&self, review_id: &str, reply: &str) -> Result<Review> {
        if reply.trim().is_empty() {
            return Err(validation("Reply cannot be empty"));
        }

        let mut review = self
            .reviews
            .get(review_id)?
            .ok_or_else(|| not_found("Review", review_id))?;

        let now = Utc::now();
        review.admin_reply = reply.trim().to_string();
        review.admin_reply_date = Some(now.date_naive());
        review.admin_reply_time = Some(now.format("%H:%M").to_string());

        self.reviews.upsert(&review)?;
        info!("Replied to review {}", review.id);
        Ok(review)
    }

    pub fn delete_review(&self, id: &str) -> Result<bool> {
        self.reviews.delete(id)
    }

    pub fn get_review(&self, id: &str) -> Result<Option<Review>> {
        self.reviews.get(id)
    }

    pub fn list_reviews(&self) -> Result<Vec<Review>> {
        self.reviews.list()
    }

    /// Linear predicate scan, order preserved from the store.
    pub fn filtered_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        Ok(self
            .reviews
            .list()?
            .into_iter()
            .filter(|review| {
                if let Some(ref query) = search {
                    let haystack = format!(
                        "{} {} {}",
                        review.comment, review.customer_name, review.activity_name
                    )
                    .to_lowercase();
                    if !haystack.contains(query) {
                        return false;
                    }
                }
                if let Some(rating) = filter.rating {
                    if review.rating != rating {
                        return false;
                    }
                }
                if let Some(ref activity_id) = filter.activity_id {
                    if &review.activity_id != activity_id {
                        return false;
                    }
                }
                if let Some(date_from) = filter.date_from {
                    if review.review_date < date_from {
                        return false;
                    }
                }
                if let Some(date_to) = filter.date_to {
                    if review.review_date > date_to {
                        return false;
                    }
                }
                true
            })
            .collect())
    }

    pub fn statistics(&self) -> Result<ReviewStatistics> {
        let reviews = self.reviews.list()?;
        let total = reviews.len() as u32;
        let replied = reviews
            .iter()
            .filter(|r| !r.admin_reply.is_empty())
            .count() as u32;

        let average_rating = if total > 0 {
            let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
            ((sum as f64 / total as f64) * 10.0).round() / 10.0
        } else {
            0.0
        };
        let reply_rate = if total > 0 {
            ((replied as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        Ok(ReviewStatistics {
            total,
            average_rating,
            replied,
            reply_rate,
        })
    }

    /// Install the sample reviews when the store is empty, the way a
    /// fresh install looks before any customer has written one.
    pub fn seed_sample_reviews(&self) -> Result<()> {
        if !self.reviews.list()?.is_empty() {
            return Ok(());
        }

        for review in sample_reviews() {
            self.reviews.upsert(&review)?;
        }
        info!("Seeded sample reviews");
        Ok(())
    }
}

fn sample_reviews() -> Vec<Review> {
    let build = |id: &str,
                 activity_id: &str,
                 activity_name: &str,
                 customer_name: &str,
                 customer_email: &str,
                 rating: u8,
                 comment: &str,
                 tags: &[&str],
                 review_date: &str,
                 review_time: &str| Review {
        id: id.to_string(),
        activity_id: activity_id.to_string(),
        activity_name: activity_name.to_string(),
        customer_name: customer_name.to_string(),
        customer_email: customer_email.to_string(),
        rating,
        comment: comment.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        review_date: review_date.parse().expect("sample review date"),
        review_time: review_time.to_string(),
        admin_reply: String::new(),
        admin_reply_date: None,
        admin_reply_time: None,
        created_at: "2025-01-15T00:00:00+00:00".to_string(),
    };

    let mut reviews = vec![
        build(
            "1",
            "1",
            "Yoga - Beginner",
            "Alice Tan",
            "alice@example.com",
            5,
            "Amazing experience! The instructor was very patient and helpful.",
            &["Relaxing", "Beginner-friendly", "Peaceful"],
            "2025-01-15",
            "14:30",
        ),
        build(
            "2",
            "1",
            "Yoga - Beginner",
            "John Lim",
            "john@example.com",
            4,
            "Great class! The poses were challenging but achievable.",
            &["Challenging", "Educational"],
            "2025-01-14",
            "09:15",
        ),
        build(
            "3",
            "2",
            "Weaving Workshop",
            "Sarah Wilson",
            "sarah@example.com",
            5,
            "Absolutely loved this workshop! The materials were high quality.",
            &["Creative", "Educational", "Fun"],
            "2025-01-13",
            "16:45",
        ),
        build(
            "4",
            "3",
            "Fitness Bootcamp",
            "Mike Chen",
            "mike@example.com",
            3,
            "The workout was intense but the class was a bit crowded.",
            &["Intense", "Crowded"],
            "2025-01-12",
            "18:20",
        ),
    ];

    // One sample arrives already replied to.
    reviews[1].admin_reply =
        "Thank you for your feedback, John! We're glad you enjoyed the class.".to_string();
    reviews[1].admin_reply_date = Some("2025-01-14".parse().expect("sample reply date"));
    reviews[1].admin_reply_time = Some("10:30".to_string());

    reviews
}
