use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::EngineSettings;
use crate::database::store::JobBoardStore;
use crate::error::Result;
use crate::services::normalization::Classification;
use crate::services::predicate::{compose, FilterCriteria};
use crate::services::snapshot::{JobRecord, Snapshot};
use crate::utils::cancel::guarded;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MIN_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Newest,
    Deadline,
}

impl SearchSort {
    /// Unknown keys fall back to newest.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("deadline") => SearchSort::Deadline,
            _ => SearchSort::Newest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Out of range values are clamped, never rejected.
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size) as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}

pub struct SearchPage {
    pub items: Vec<JobRecord>,
    pub total_items: i64,
    pub total_pages: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn JobBoardStore>,
    settings: Arc<EngineSettings>,
}

impl SearchService {
    pub fn new(store: Arc<dyn JobBoardStore>, settings: Arc<EngineSettings>) -> Self {
        Self { store, settings }
    }

    pub async fn search(
        &self,
        criteria: &FilterCriteria,
        sort: SearchSort,
        request: PageRequest,
        token: &CancellationToken,
    ) -> Result<SearchPage> {
        let classification = &self.settings.classification;
        let page = guarded(token, self.settings.query_timeout, async {
            let snapshot = Snapshot::load(self.store.as_ref(), classification).await?;
            Ok(execute(&snapshot, criteria, sort, request, classification))
        })
        .await?;

        tracing::info!(
            total = page.total_items,
            page = page.page,
            page_size = page.page_size,
            sort = ?sort,
            "Search executed"
        );
        Ok(page)
    }
}

/// Filters, orders and slices one snapshot. Totals always describe the whole
/// filtered set, not the page.
pub fn execute(
    snapshot: &Snapshot,
    criteria: &FilterCriteria,
    sort: SearchSort,
    request: PageRequest,
    classification: &Classification,
) -> SearchPage {
    let predicate = compose(criteria, snapshot, classification);
    tracing::debug!(stages = ?predicate.stage_names(), "Composed search predicate");

    let mut matches: Vec<&JobRecord> = predicate.filter(&snapshot.records).collect();
    match sort {
        SearchSort::Newest => matches.sort_by(|a, b| newest_first(a, b)),
        SearchSort::Deadline => matches.sort_by(|a, b| {
            deadline_first(a, b).then_with(|| newest_first(a, b))
        }),
    }

    let total_items = matches.len() as i64;
    let total_pages = if total_items == 0 {
        0
    } else {
        (total_items + request.page_size - 1) / request.page_size
    };

    let items = matches
        .into_iter()
        .skip(request.offset())
        .take(request.page_size as usize)
        .cloned()
        .collect();

    SearchPage {
        items,
        total_items,
        total_pages,
        page: request.page,
        page_size: request.page_size,
    }
}

fn newest_first(a: &JobRecord, b: &JobRecord) -> Ordering {
    b.posting
        .listed_at()
        .cmp(&a.posting.listed_at())
        .then_with(|| a.posting.id.cmp(&b.posting.id))
}

/// Earliest deadline first, postings without one last.
fn deadline_first(a: &JobRecord, b: &JobRecord) -> Ordering {
    match (a.posting.deadline, b.posting.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MockJobBoardStore;
    use crate::error::Error;

    #[test]
    fn page_request_is_clamped() {
        assert_eq!(
            PageRequest::clamped(Some(0), Some(3)),
            PageRequest { page: 1, page_size: 5 }
        );
        assert_eq!(
            PageRequest::clamped(Some(4), Some(500)),
            PageRequest { page: 4, page_size: 50 }
        );
        assert_eq!(PageRequest::default().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn sort_key_parsing_is_permissive() {
        assert_eq!(SearchSort::parse(Some("Deadline")), SearchSort::Deadline);
        assert_eq!(SearchSort::parse(Some("oldest")), SearchSort::Newest);
        assert_eq!(SearchSort::parse(None), SearchSort::Newest);
    }

    #[tokio::test]
    async fn read_failures_surface_unmodified() {
        let mut store = MockJobBoardStore::new();
        store
            .expect_postings()
            .times(1)
            .returning(|_| Err(Error::Database(sqlx::Error::PoolTimedOut)));
        store.expect_companies().returning(|| Ok(Vec::new()));
        store.expect_technologies().returning(|| Ok(Vec::new()));
        store.expect_categories().returning(|| Ok(Vec::new()));
        store.expect_posting_technologies().never();

        let service = SearchService::new(Arc::new(store), Arc::new(EngineSettings::default()));
        let outcome = service
            .search(
                &FilterCriteria::default(),
                SearchSort::Newest,
                PageRequest::default(),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(
            outcome,
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        ));
    }
}
