use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::store::JobBoardStore;
use crate::error::Result;
use crate::models::{
    category::Category, company::Company, posting::Posting,
    posting_technology::PostingTechnologyRow, technology::Technology,
};

/// Fixed in-memory dataset. Used for fixtures and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub postings: Vec<Posting>,
    pub companies: Vec<Company>,
    pub technologies: Vec<Technology>,
    pub categories: Vec<Category>,
    pub links: Vec<PostingTechnologyRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    pub fn with_company(mut self, company: Company) -> Self {
        self.companies.push(company);
        self
    }

    pub fn with_technology(mut self, technology: Technology) -> Self {
        self.technologies.push(technology);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_link(mut self, link: PostingTechnologyRow) -> Self {
        self.links.push(link);
        self
    }
}

#[async_trait]
impl JobBoardStore for MemoryStore {
    async fn postings(&self, statuses: &[String]) -> Result<Vec<Posting>> {
        Ok(self
            .postings
            .iter()
            .filter(|p| {
                statuses
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(p.status.trim()))
            })
            .cloned()
            .collect())
    }

    async fn companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.clone())
    }

    async fn technologies(&self) -> Result<Vec<Technology>> {
        Ok(self.technologies.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn posting_technologies(&self, posting_ids: &[Uuid]) -> Result<Vec<PostingTechnologyRow>> {
        let wanted: HashSet<&Uuid> = posting_ids.iter().collect();
        Ok(self
            .links
            .iter()
            .filter(|link| wanted.contains(&link.posting_id))
            .cloned()
            .collect())
    }
}
