use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EngineSettings;
use crate::database::store::JobBoardStore;
use crate::error::Result;
use crate::models::company::Company;
use crate::services::facet_service::{sorted_counts, FacetCount};
use crate::services::normalization::{parse_company_size, Classification};
use crate::utils::cancel::guarded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeBucketCount {
    pub key: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyAggregates {
    pub size_histogram: Vec<SizeBucketCount>,
    pub location_histogram: Vec<FacetCount>,
}

#[derive(Clone)]
pub struct CompanyStatsService {
    store: Arc<dyn JobBoardStore>,
    settings: Arc<EngineSettings>,
}

impl CompanyStatsService {
    pub fn new(store: Arc<dyn JobBoardStore>, settings: Arc<EngineSettings>) -> Self {
        Self { store, settings }
    }

    pub async fn aggregates(&self, only_active: bool, token: &CancellationToken) -> Result<CompanyAggregates> {
        let aggregates = guarded(token, self.settings.query_timeout, async {
            let companies = self.store.companies().await?;
            Ok(build_company_aggregates(
                &companies,
                only_active,
                &self.settings.classification,
            ))
        })
        .await?;

        tracing::info!(
            only_active,
            locations = aggregates.location_histogram.len(),
            "Company aggregates computed"
        );
        Ok(aggregates)
    }
}

/// Size buckets are always all listed. Locations that do not classify are
/// dropped rather than counted under an "other" label.
pub fn build_company_aggregates(
    companies: &[Company],
    only_active: bool,
    classification: &Classification,
) -> CompanyAggregates {
    let included = companies
        .iter()
        .filter(|company| !only_active || company.is_active);

    let mut sizes: HashMap<&str, usize> = HashMap::new();
    let mut locations: HashMap<&str, usize> = HashMap::new();
    for company in included {
        if let Some(rule) = company
            .size
            .as_deref()
            .and_then(parse_company_size)
            .and_then(|employees| classification.size_bucket(employees))
        {
            *sizes.entry(rule.key.as_str()).or_default() += 1;
        }
        if let Some(label) = company
            .location
            .as_deref()
            .and_then(|raw| classification.classify_location(raw))
        {
            *locations.entry(label).or_default() += 1;
        }
    }

    let size_histogram = classification
        .size_buckets
        .iter()
        .map(|rule| SizeBucketCount {
            key: rule.key.clone(),
            label: rule.label.clone(),
            count: sizes.get(rule.key.as_str()).copied().unwrap_or(0),
        })
        .collect();

    CompanyAggregates {
        size_histogram,
        location_histogram: sorted_counts(locations),
    }
}
