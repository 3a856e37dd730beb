use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EngineSettings;
use crate::database::store::JobBoardStore;
use crate::error::{Error, Result};
use crate::services::normalization::{parse_salary_band, Classification, SalaryBand};
use crate::services::predicate::{compose_excluding, FacetDimension, FilterCriteria};
use crate::services::snapshot::Snapshot;
use crate::utils::cancel::guarded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSet {
    pub locations: Vec<FacetCount>,
    pub seniorities: Vec<FacetCount>,
    pub job_types: Vec<FacetCount>,
    pub salary_bands: Vec<FacetCount>,
    /// Bounds for the single-value salary slider.
    pub salary_range: Option<SalaryBand>,
}

#[derive(Clone)]
pub struct FacetService {
    store: Arc<dyn JobBoardStore>,
    settings: Arc<EngineSettings>,
}

impl FacetService {
    pub fn new(store: Arc<dyn JobBoardStore>, settings: Arc<EngineSettings>) -> Self {
        Self { store, settings }
    }

    /// Each dimension is counted on its own worker against the criteria with
    /// only that dimension cleared. Workers stop early once the request is
    /// cancelled or times out.
    pub async fn facets(&self, criteria: &FilterCriteria, token: &CancellationToken) -> Result<FacetSet> {
        let classification = self.settings.classification.clone();
        let workers = token.child_token();
        let facets = guarded(token, self.settings.query_timeout, async {
            let _abort = workers.clone().drop_guard();
            let snapshot = Arc::new(Snapshot::load(self.store.as_ref(), &classification).await?);

            let spawn = |dimension: FacetDimension| {
                let snapshot = snapshot.clone();
                let criteria = criteria.clone();
                let classification = classification.clone();
                let workers = workers.clone();
                tokio::task::spawn_blocking(move || {
                    count_facet(&snapshot, &criteria, dimension, &classification, &workers)
                })
            };

            let (locations, seniorities, job_types, salary_bands) = tokio::try_join!(
                spawn(FacetDimension::Location),
                spawn(FacetDimension::Seniority),
                spawn(FacetDimension::JobType),
                spawn(FacetDimension::SalaryBand),
            )
            .map_err(|e| Error::Internal(format!("Facet worker failed: {}", e)))?;

            Ok(FacetSet::assemble(locations?, seniorities?, job_types?, salary_bands?))
        })
        .await?;

        tracing::info!(
            locations = facets.locations.len(),
            seniorities = facets.seniorities.len(),
            job_types = facets.job_types.len(),
            salary_bands = facets.salary_bands.len(),
            "Facets computed"
        );
        Ok(facets)
    }
}

impl FacetSet {
    pub fn assemble(
        locations: Vec<FacetCount>,
        seniorities: Vec<FacetCount>,
        job_types: Vec<FacetCount>,
        salary_bands: Vec<FacetCount>,
    ) -> Self {
        let salary_range = salary_range(&salary_bands);
        Self {
            locations,
            seniorities,
            job_types,
            salary_bands,
            salary_range,
        }
    }

    pub fn dimension(&self, dimension: FacetDimension) -> &[FacetCount] {
        match dimension {
            FacetDimension::Location => &self.locations,
            FacetDimension::Seniority => &self.seniorities,
            FacetDimension::JobType => &self.job_types,
            FacetDimension::SalaryBand => &self.salary_bands,
        }
    }
}

/// Counts matching records per label of `dimension`, ignoring that
/// dimension's own selections. Labels are grouped case-insensitively, the way
/// the predicate matches them. Sorted by count desc, then label asc.
pub fn count_facet(
    snapshot: &Snapshot,
    criteria: &FilterCriteria,
    dimension: FacetDimension,
    classification: &Classification,
    token: &CancellationToken,
) -> Result<Vec<FacetCount>> {
    let predicate = compose_excluding(criteria, dimension, snapshot, classification);
    tracing::debug!(
        dimension = dimension.as_str(),
        stages = ?predicate.stage_names(),
        "Counting facet"
    );

    let mut groups: HashMap<String, LabelGroup> = HashMap::new();
    for record in predicate.filter(&snapshot.records) {
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(label) = dimension.label(record) {
            groups.entry(label.to_lowercase()).or_default().add(label);
        }
    }

    let counts: HashMap<&str, usize> = groups
        .values()
        .map(|group| (group.display(), group.total))
        .collect();
    Ok(sorted_counts(counts))
}

/// Spellings seen for one case-folded label.
#[derive(Default)]
struct LabelGroup<'a> {
    total: usize,
    spellings: HashMap<&'a str, usize>,
}

impl<'a> LabelGroup<'a> {
    fn add(&mut self, label: &'a str) {
        self.total += 1;
        *self.spellings.entry(label).or_default() += 1;
    }

    /// Most frequent spelling; ties go to the smallest.
    fn display(&self) -> &'a str {
        self.spellings
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(label, _)| *label)
            .unwrap_or_default()
    }
}

pub(crate) fn sorted_counts(counts: HashMap<&str, usize>) -> Vec<FacetCount> {
    let mut values: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();
    values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    values
}

fn salary_range(bands: &[FacetCount]) -> Option<SalaryBand> {
    let parsed: Vec<SalaryBand> = bands
        .iter()
        .filter_map(|band| parse_salary_band(&band.value))
        .collect();

    let min = parsed.iter().map(|band| band.min).min()?;
    let max = parsed
        .iter()
        .map(|band| band.max)
        .try_fold(0u32, |acc, upper| upper.map(|u| acc.max(u)));
    Some(SalaryBand { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posting::Posting;
    use chrono::Utc;

    fn band(value: &str) -> FacetCount {
        FacetCount {
            value: value.to_string(),
            count: 1,
        }
    }

    #[test]
    fn salary_range_spans_all_bands() {
        let range = salary_range(&[band("3000-5000"), band("1000-2000")]);
        assert_eq!(range, Some(SalaryBand { min: 1000, max: Some(5000) }));
    }

    #[test]
    fn open_band_opens_the_range() {
        let range = salary_range(&[band("3000-5000"), band("6000+")]);
        assert_eq!(range, Some(SalaryBand { min: 3000, max: None }));
    }

    #[test]
    fn no_parseable_band_means_no_range() {
        assert_eq!(salary_range(&[band("negotiable")]), None);
        assert_eq!(salary_range(&[]), None);
    }

    fn snapshot(seniorities: &[&str]) -> Snapshot {
        let company_id = uuid::Uuid::new_v4();
        let postings = seniorities
            .iter()
            .map(|seniority| Posting {
                id: uuid::Uuid::new_v4(),
                title: "Engineer".to_string(),
                description: None,
                location: Some("Sofia".to_string()),
                is_remote: false,
                job_type: Some("Full-time".to_string()),
                seniority: Some(seniority.to_string()),
                salary_band: None,
                status: "Active".to_string(),
                company_id,
                category_id: None,
                deadline: None,
                published_at: None,
                created_at: Utc::now(),
            })
            .collect();
        Snapshot::assemble(
            postings,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            &Classification::default(),
        )
    }

    #[test]
    fn labels_differing_in_case_share_one_count() {
        let counts = count_facet(
            &snapshot(&["Senior", "senior", "Senior", "Mid"]),
            &FilterCriteria::default(),
            FacetDimension::Seniority,
            &Classification::default(),
            &CancellationToken::new(),
        )
        .expect("counts");
        assert_eq!(
            counts,
            vec![
                FacetCount { value: "Senior".to_string(), count: 3 },
                FacetCount { value: "Mid".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn equally_common_spellings_pick_the_smallest() {
        let counts = count_facet(
            &snapshot(&["senior", "Senior"]),
            &FilterCriteria::default(),
            FacetDimension::Seniority,
            &Classification::default(),
            &CancellationToken::new(),
        )
        .expect("counts");
        assert_eq!(counts, vec![FacetCount { value: "Senior".to_string(), count: 2 }]);
    }

    #[test]
    fn cancelled_worker_stops_counting() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome = count_facet(
            &snapshot(&["Senior", "Mid"]),
            &FilterCriteria::default(),
            FacetDimension::Seniority,
            &Classification::default(),
            &token,
        );
        assert!(matches!(outcome, Err(Error::Cancelled)));
    }

    #[test]
    fn counts_sort_by_count_then_label() {
        let counts: HashMap<&str, usize> = [("Varna", 2), ("Sofia", 2), ("Ruse", 5)].into_iter().collect();
        let sorted: Vec<String> = sorted_counts(counts).into_iter().map(|c| c.value).collect();
        assert_eq!(sorted, vec!["Ruse", "Sofia", "Varna"]);
    }
}
