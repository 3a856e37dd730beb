use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::database::store::JobBoardStore;
use crate::error::Result;
use crate::models::{category::Category, technology::Technology};
use crate::services::normalization::Classification;
use crate::services::predicate::{compose, FilterCriteria};
use crate::services::snapshot::Snapshot;
use crate::utils::cancel::guarded;

pub const DEFAULT_TAKE_TECHS: i64 = 6;
pub const MAX_TAKE_TECHS: i64 = 12;

#[derive(Debug, Clone)]
pub struct TechCount {
    pub technology: Technology,
    pub jobs_count: usize,
}

#[derive(Debug, Clone)]
pub struct CategorySection {
    pub category: Category,
    pub jobs_count: usize,
    pub techs: Vec<TechCount>,
}

#[derive(Debug, Clone, Default)]
pub struct SectionRequest {
    pub take_techs: Option<i64>,
    pub location: Option<String>,
    pub remote: Option<bool>,
}

impl SectionRequest {
    pub fn take(&self) -> usize {
        self.take_techs
            .unwrap_or(DEFAULT_TAKE_TECHS)
            .clamp(1, MAX_TAKE_TECHS) as usize
    }

    /// Unrecognised locations place no constraint on the sections.
    pub fn criteria(&self, classification: &Classification) -> FilterCriteria {
        let locations: BTreeSet<String> = self
            .location
            .as_deref()
            .and_then(|raw| classification.canonical_location(raw))
            .map(|label| BTreeSet::from([label.to_string()]))
            .unwrap_or_default();

        FilterCriteria {
            locations,
            remote: self.remote,
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct SectionService {
    store: Arc<dyn JobBoardStore>,
    settings: Arc<EngineSettings>,
}

impl SectionService {
    pub fn new(store: Arc<dyn JobBoardStore>, settings: Arc<EngineSettings>) -> Self {
        Self { store, settings }
    }

    pub async fn sections(
        &self,
        request: &SectionRequest,
        token: &CancellationToken,
    ) -> Result<Vec<CategorySection>> {
        let classification = &self.settings.classification;
        let sections = guarded(token, self.settings.query_timeout, async {
            let snapshot = Snapshot::load(self.store.as_ref(), classification).await?;
            Ok(build_sections(
                &snapshot,
                request,
                classification,
                &self.settings.language_slug_prefix,
            ))
        })
        .await?;

        tracing::info!(
            categories = sections.len(),
            take_techs = request.take(),
            "Home sections computed"
        );
        Ok(sections)
    }
}

#[derive(Default)]
struct CategoryTally {
    jobs: usize,
    techs: HashMap<Uuid, usize>,
}

/// Per-category posting counts and top technologies. Technologies whose slug
/// starts with `language_prefix` are left out of the pills.
pub fn build_sections(
    snapshot: &Snapshot,
    request: &SectionRequest,
    classification: &Classification,
    language_prefix: &str,
) -> Vec<CategorySection> {
    let predicate = compose(&request.criteria(classification), snapshot, classification);
    let language_prefix = language_prefix.to_lowercase();
    let is_language = |technology: &Technology| {
        !language_prefix.is_empty() && technology.slug.to_lowercase().starts_with(&language_prefix)
    };

    let mut tallies: HashMap<Uuid, CategoryTally> = HashMap::new();
    let mut technologies: HashMap<Uuid, &Technology> = HashMap::new();
    for record in predicate.filter(&snapshot.records) {
        let Some(category) = &record.category else {
            continue;
        };
        let tally = tallies.entry(category.id).or_default();
        tally.jobs += 1;
        for technology in record.technologies.iter().filter(|t| !is_language(t)) {
            *tally.techs.entry(technology.id).or_default() += 1;
            technologies.insert(technology.id, technology);
        }
    }

    let take = request.take();
    let mut sections: Vec<CategorySection> = snapshot
        .categories
        .iter()
        .map(|category| {
            let tally = tallies.remove(&category.id).unwrap_or_default();
            let mut techs: Vec<TechCount> = tally
                .techs
                .into_iter()
                .filter_map(|(id, jobs_count)| {
                    technologies.get(&id).map(|technology| TechCount {
                        technology: (*technology).clone(),
                        jobs_count,
                    })
                })
                .collect();
            techs.sort_by(|a, b| {
                b.jobs_count
                    .cmp(&a.jobs_count)
                    .then_with(|| a.technology.name.cmp(&b.technology.name))
            });
            techs.truncate(take);

            CategorySection {
                category: category.clone(),
                jobs_count: tally.jobs,
                techs,
            }
        })
        .collect();

    sections.sort_by(|a, b| {
        b.jobs_count
            .cmp(&a.jobs_count)
            .then_with(|| a.category.name.cmp(&b.category.name))
    });
    sections
}
