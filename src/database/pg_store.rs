use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::JobBoardStore;
use crate::error::Result;
use crate::models::{
    category::Category, company::Company, posting::Posting,
    posting_technology::PostingTechnologyRow, technology::Technology,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobBoardStore for PgStore {
    async fn postings(&self, statuses: &[String]) -> Result<Vec<Posting>> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_lowercase()).collect();
        let items = sqlx::query_as::<_, Posting>(
            r#"
            SELECT id, title, description, location, is_remote, job_type, seniority, salary_band,
                   status, company_id, category_id, deadline, published_at, created_at
            FROM postings
            WHERE LOWER(status) = ANY($1)
            "#,
        )
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn companies(&self) -> Result<Vec<Company>> {
        let items = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, logo_url, location, size, is_active
            FROM companies
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn technologies(&self) -> Result<Vec<Technology>> {
        let items = sqlx::query_as::<_, Technology>(
            r#"
            SELECT id, name, slug, logo_url
            FROM technologies
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let items = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, icon_url
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn posting_technologies(&self, posting_ids: &[Uuid]) -> Result<Vec<PostingTechnologyRow>> {
        if posting_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, PostingTechnologyRow>(
            r#"
            SELECT posting_id, technology_id, technology_name
            FROM posting_technologies
            WHERE posting_id = ANY($1)
            "#,
        )
        .bind(posting_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
