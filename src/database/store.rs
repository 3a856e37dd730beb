use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    category::Category, company::Company, posting::Posting,
    posting_technology::PostingTechnologyRow, technology::Technology,
};

/// Read-only view over the job board tables. Implementations must not retry:
/// failures go back to the caller as they are.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobBoardStore: Send + Sync {
    /// Postings whose status is one of `statuses` (compared lowercase).
    async fn postings(&self, statuses: &[String]) -> Result<Vec<Posting>>;

    async fn companies(&self) -> Result<Vec<Company>>;

    async fn technologies(&self) -> Result<Vec<Technology>>;

    async fn categories(&self) -> Result<Vec<Category>>;

    /// Batched link lookup for a set of postings.
    async fn posting_technologies(&self, posting_ids: &[Uuid]) -> Result<Vec<PostingTechnologyRow>>;
}
