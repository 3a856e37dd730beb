use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::database::store::JobBoardStore;
use crate::error::Result;
use crate::models::{
    category::Category,
    company::Company,
    posting::{Posting, VISIBLE_STATUSES},
    posting_technology::{PostingTechnologyRow, TechnologyRef},
    technology::{name_key, Technology},
};
use crate::services::normalization::Classification;

/// A visible posting joined with everything the predicate stages look at.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub posting: Posting,
    pub company: Option<Company>,
    pub category: Option<Category>,
    /// Catalogue technologies, one entry per technology, ordered by name.
    pub technologies: Vec<Technology>,
    /// Legacy link names that match no catalogue entry. Searchable, never shown.
    pub loose_technology_names: Vec<String>,
    /// Canonical city label when recognised, otherwise the trimmed raw location.
    /// Remote postings with no location fall under the remote label.
    pub location_label: Option<String>,
}

impl JobRecord {
    pub fn has_technology(&self, id: Uuid) -> bool {
        self.technologies.iter().any(|t| t.id == id)
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.name.as_str())
    }
}

/// Point-in-time view of the catalogue for a single request.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<JobRecord>,
    pub technologies: Vec<Technology>,
    pub categories: Vec<Category>,
}

impl Snapshot {
    pub async fn load(store: &dyn JobBoardStore, classification: &Classification) -> Result<Self> {
        let statuses: Vec<String> = VISIBLE_STATUSES.iter().map(|s| s.to_string()).collect();
        let (postings, companies, technologies, categories) = tokio::try_join!(
            store.postings(&statuses),
            store.companies(),
            store.technologies(),
            store.categories(),
        )?;

        let posting_ids: Vec<Uuid> = postings.iter().map(|p| p.id).collect();
        let links = store.posting_technologies(&posting_ids).await?;

        tracing::debug!(
            postings = postings.len(),
            links = links.len(),
            technologies = technologies.len(),
            "Loaded search snapshot"
        );

        Ok(Self::assemble(
            postings,
            companies,
            technologies,
            categories,
            links,
            classification,
        ))
    }

    pub fn assemble(
        postings: Vec<Posting>,
        companies: Vec<Company>,
        technologies: Vec<Technology>,
        categories: Vec<Category>,
        links: Vec<PostingTechnologyRow>,
        classification: &Classification,
    ) -> Self {
        let companies: HashMap<Uuid, Company> = companies.into_iter().map(|c| (c.id, c)).collect();
        let records: Vec<JobRecord> = {
            let category_by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
            let tech_by_id: HashMap<Uuid, &Technology> = technologies.iter().map(|t| (t.id, t)).collect();
            let tech_by_name: HashMap<String, &Technology> =
                technologies.iter().map(|t| (t.name_key(), t)).collect();

            let mut links_by_posting: HashMap<Uuid, Vec<TechnologyRef>> = HashMap::new();
            for link in links.into_iter().filter_map(PostingTechnologyRow::into_link) {
                links_by_posting
                    .entry(link.posting_id)
                    .or_default()
                    .push(link.technology);
            }

            postings
                .into_iter()
                .filter(Posting::is_visible)
                .map(|posting| {
                    let refs = links_by_posting.remove(&posting.id).unwrap_or_default();
                    let (technologies, loose_technology_names) =
                        resolve_links(refs, &tech_by_id, &tech_by_name);
                    let location_label = location_label(&posting, classification);

                    JobRecord {
                        company: companies.get(&posting.company_id).cloned(),
                        category: posting
                            .category_id
                            .and_then(|id| category_by_id.get(&id))
                            .map(|c| (*c).clone()),
                        technologies,
                        loose_technology_names,
                        location_label,
                        posting,
                    }
                })
                .collect()
        };

        Self {
            records,
            technologies,
            categories,
        }
    }

    /// Resolves a technology filter given as an id, a slug or a display name.
    pub fn resolve_technology(&self, reference: &str) -> Option<Uuid> {
        let reference = reference.trim();
        if let Ok(id) = Uuid::parse_str(reference) {
            return self.technologies.iter().find(|t| t.id == id).map(|t| t.id);
        }

        let key = name_key(reference);
        self.technologies
            .iter()
            .find(|t| t.slug.eq_ignore_ascii_case(reference) || t.name_key() == key)
            .map(|t| t.id)
    }
}

/// Remote postings without any location text are grouped under the remote label.
fn location_label(posting: &Posting, classification: &Classification) -> Option<String> {
    let raw = posting
        .location
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty());

    match raw {
        Some(raw) => Some(
            classification
                .classify_location(raw)
                .map_or_else(|| raw.to_string(), str::to_string),
        ),
        None if posting.is_remote => Some(classification.remote_label().to_string()),
        None => None,
    }
}

fn resolve_links(
    refs: Vec<TechnologyRef>,
    tech_by_id: &HashMap<Uuid, &Technology>,
    tech_by_name: &HashMap<String, &Technology>,
) -> (Vec<Technology>, Vec<String>) {
    let mut seen_ids = HashSet::new();
    let mut seen_loose = HashSet::new();
    let mut resolved = Vec::new();
    let mut loose = Vec::new();

    for reference in refs {
        let technology = match reference {
            TechnologyRef::Resolved(id) => tech_by_id.get(&id).copied(),
            TechnologyRef::Unresolved(name) => {
                let key = name_key(&name);
                match tech_by_name.get(&key) {
                    Some(technology) => Some(*technology),
                    None => {
                        if seen_loose.insert(key) {
                            loose.push(name);
                        }
                        continue;
                    }
                }
            }
        };

        if let Some(technology) = technology {
            if seen_ids.insert(technology.id) {
                resolved.push(technology.clone());
            }
        }
    }

    resolved.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    (resolved, loose)
}
