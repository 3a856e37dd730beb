use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle states that make a posting eligible for search and aggregates.
pub const VISIBLE_STATUSES: [&str; 3] = ["active", "open", "published"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Posting {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_remote: bool,
    pub job_type: Option<String>,
    pub seniority: Option<String>,
    pub salary_band: Option<String>,
    pub status: String,
    pub company_id: Uuid,
    pub category_id: Option<Uuid>,
    pub deadline: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Posting {
    pub fn is_visible(&self) -> bool {
        let status = self.status.trim();
        VISIBLE_STATUSES
            .iter()
            .any(|visible| visible.eq_ignore_ascii_case(status))
    }

    pub fn listed_at(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}
