//! Filter criteria and the predicate built from them.
//!
//! A predicate is an ordered list of named stages reduced with AND. The only
//! OR across dimensions lives inside [`LocationRule`].

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::services::normalization::Classification;
use crate::services::snapshot::{JobRecord, Snapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub category: Option<String>,
    /// Technology id, slug or name.
    pub technology: Option<String>,
    pub locations: BTreeSet<String>,
    pub seniorities: BTreeSet<String>,
    pub job_types: BTreeSet<String>,
    pub salary_bands: BTreeSet<String>,
    pub remote: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetDimension {
    Location,
    Seniority,
    JobType,
    SalaryBand,
}

impl FacetDimension {
    pub const ALL: [FacetDimension; 4] = [
        FacetDimension::Location,
        FacetDimension::Seniority,
        FacetDimension::JobType,
        FacetDimension::SalaryBand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetDimension::Location => "location",
            FacetDimension::Seniority => "seniority",
            FacetDimension::JobType => "job_type",
            FacetDimension::SalaryBand => "salary_band",
        }
    }

    /// The value a record is grouped under for this facet.
    pub fn label<'a>(&self, record: &'a JobRecord) -> Option<&'a str> {
        let raw = match self {
            FacetDimension::Location => record.location_label.as_deref(),
            FacetDimension::Seniority => record.posting.seniority.as_deref(),
            FacetDimension::JobType => record.posting.job_type.as_deref(),
            FacetDimension::SalaryBand => record.posting.salary_band.as_deref(),
        };
        raw.map(str::trim).filter(|label| !label.is_empty())
    }
}

impl FilterCriteria {
    /// Same criteria with one facet's own selections cleared. The location
    /// facet owns the remote toggle as well.
    pub fn without(&self, dimension: FacetDimension) -> Self {
        let mut criteria = self.clone();
        match dimension {
            FacetDimension::Location => {
                criteria.locations.clear();
                criteria.remote = None;
            }
            FacetDimension::Seniority => criteria.seniorities.clear(),
            FacetDimension::JobType => criteria.job_types.clear(),
            FacetDimension::SalaryBand => criteria.salary_bands.clear(),
        }
        criteria
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationTarget {
    /// A recognised city (or the remote label), matched on the canonical label.
    Known(String),
    /// Unrecognised input, matched by case-insensitive equality on the raw text.
    Literal(String),
}

impl LocationTarget {
    fn matches(&self, record: &JobRecord) -> bool {
        match self {
            LocationTarget::Known(label) => record.location_label.as_deref() == Some(label.as_str()),
            LocationTarget::Literal(value) => record
                .posting
                .location
                .as_deref()
                .map_or(false, |raw| raw.trim().to_lowercase() == *value),
        }
    }
}

/// Location selections combined with the remote flag.
///
/// remote=true plus locations is an OR, anything else is an AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRule {
    pub targets: Vec<LocationTarget>,
    pub remote: Option<bool>,
}

impl LocationRule {
    pub fn from_criteria(criteria: &FilterCriteria, classification: &Classification) -> Option<Self> {
        let targets: Vec<LocationTarget> = criteria
            .locations
            .iter()
            .filter(|value| !value.trim().is_empty())
            .map(|value| match classification.canonical_location(value) {
                Some(label) => LocationTarget::Known(label.to_string()),
                None => LocationTarget::Literal(value.trim().to_lowercase()),
            })
            .collect();

        if targets.is_empty() && criteria.remote.is_none() {
            return None;
        }
        Some(Self {
            targets,
            remote: criteria.remote,
        })
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        let is_remote = record.posting.is_remote;
        let location_hit = || self.targets.iter().any(|target| target.matches(record));

        match (self.targets.is_empty(), self.remote) {
            (true, None) => true,
            (true, Some(remote)) => is_remote == remote,
            (false, Some(true)) => is_remote || location_hit(),
            (false, Some(false)) => !is_remote && location_hit(),
            (false, None) => location_hit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Visible,
    /// The requested technology does not exist: nothing matches.
    UnknownTechnology,
    Category(String),
    Technology(Uuid),
    Text(String),
    LocationOrRemote(LocationRule),
    Seniority(BTreeSet<String>),
    JobType(BTreeSet<String>),
    SalaryBand(BTreeSet<String>),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Visible => "visible",
            Stage::UnknownTechnology => "unknown_technology",
            Stage::Category(_) => "category",
            Stage::Technology(_) => "technology",
            Stage::Text(_) => "text",
            Stage::LocationOrRemote(_) => "location_or_remote",
            Stage::Seniority(_) => "seniority",
            Stage::JobType(_) => "job_type",
            Stage::SalaryBand(_) => "salary_band",
        }
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        match self {
            Stage::Visible => record.posting.is_visible(),
            Stage::UnknownTechnology => false,
            Stage::Category(slug) => record
                .category
                .as_ref()
                .map_or(false, |category| category.slug.to_lowercase() == *slug),
            Stage::Technology(id) => record.has_technology(*id),
            Stage::Text(needle) => text_matches(record, needle),
            Stage::LocationOrRemote(rule) => rule.matches(record),
            Stage::Seniority(selected) => label_in(record.posting.seniority.as_deref(), selected),
            Stage::JobType(selected) => label_in(record.posting.job_type.as_deref(), selected),
            Stage::SalaryBand(selected) => label_in(record.posting.salary_band.as_deref(), selected),
        }
    }
}

fn label_in(label: Option<&str>, selected: &BTreeSet<String>) -> bool {
    label.map_or(false, |label| selected.contains(&label.trim().to_lowercase()))
}

/// One OR across title, description, company name and attached technologies.
fn text_matches(record: &JobRecord, needle: &str) -> bool {
    let hit = |haystack: &str| haystack.to_lowercase().contains(needle);
    let posting = &record.posting;

    hit(&posting.title)
        || posting.description.as_deref().map_or(false, hit)
        || record.company_name().map_or(false, hit)
        || record
            .technologies
            .iter()
            .any(|technology| hit(&technology.name) || hit(&technology.slug))
        || record.loose_technology_names.iter().any(|name| hit(name))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    stages: Vec<Stage>,
}

impl Predicate {
    pub fn matches(&self, record: &JobRecord) -> bool {
        self.stages.iter().all(|stage| stage.matches(record))
    }

    pub fn filter<'a>(&'a self, records: &'a [JobRecord]) -> impl Iterator<Item = &'a JobRecord> + 'a {
        records.iter().filter(move |record| self.matches(record))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }
}

pub fn compose(criteria: &FilterCriteria, snapshot: &Snapshot, classification: &Classification) -> Predicate {
    let mut stages = vec![Stage::Visible];

    if let Some(technology) = non_empty(&criteria.technology) {
        match snapshot.resolve_technology(technology) {
            Some(id) => stages.push(Stage::Technology(id)),
            None => stages.push(Stage::UnknownTechnology),
        }
    }
    if let Some(category) = non_empty(&criteria.category) {
        stages.push(Stage::Category(category.to_lowercase()));
    }
    if let Some(query) = non_empty(&criteria.query) {
        stages.push(Stage::Text(query.to_lowercase()));
    }
    if let Some(rule) = LocationRule::from_criteria(criteria, classification) {
        stages.push(Stage::LocationOrRemote(rule));
    }
    if !criteria.seniorities.is_empty() {
        stages.push(Stage::Seniority(lowercased(&criteria.seniorities)));
    }
    if !criteria.job_types.is_empty() {
        stages.push(Stage::JobType(lowercased(&criteria.job_types)));
    }
    if !criteria.salary_bands.is_empty() {
        stages.push(Stage::SalaryBand(lowercased(&criteria.salary_bands)));
    }

    Predicate { stages }
}

pub fn compose_excluding(
    criteria: &FilterCriteria,
    dimension: FacetDimension,
    snapshot: &Snapshot,
    classification: &Classification,
) -> Predicate {
    compose(&criteria.without(dimension), snapshot, classification)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn lowercased(values: &BTreeSet<String>) -> BTreeSet<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posting::Posting;
    use chrono::Utc;

    fn record(location: &str, is_remote: bool) -> JobRecord {
        let classification = Classification::default();
        let posting = Posting {
            id: Uuid::new_v4(),
            title: "Engineer".to_string(),
            description: None,
            location: Some(location.to_string()),
            is_remote,
            job_type: None,
            seniority: None,
            salary_band: None,
            status: "Active".to_string(),
            company_id: Uuid::new_v4(),
            category_id: None,
            deadline: None,
            published_at: None,
            created_at: Utc::now(),
        };
        JobRecord {
            location_label: classification.classify_location(location).map(str::to_string),
            posting,
            company: None,
            category: None,
            technologies: Vec::new(),
            loose_technology_names: Vec::new(),
        }
    }

    fn rule(locations: &[&str], remote: Option<bool>) -> LocationRule {
        let criteria = FilterCriteria {
            locations: locations.iter().map(|l| l.to_string()).collect(),
            remote,
            ..Default::default()
        };
        LocationRule::from_criteria(&criteria, &Classification::default()).expect("rule")
    }

    #[test]
    fn remote_and_locations_are_ored() {
        let rule = rule(&["Sofia"], Some(true));
        assert!(rule.matches(&record("Varna", true)));
        assert!(rule.matches(&record("Sofia", false)));
        assert!(!rule.matches(&record("Varna", false)));
    }

    #[test]
    fn locations_alone_require_a_match() {
        let rule = rule(&["sofia"], None);
        assert!(rule.matches(&record("Sofia, Bulgaria", false)));
        assert!(!rule.matches(&record("Varna", true)));
    }

    #[test]
    fn remote_alone_requires_the_flag() {
        let rule = rule(&[], Some(true));
        assert!(rule.matches(&record("Varna", true)));
        assert!(!rule.matches(&record("Sofia", false)));
    }

    #[test]
    fn unknown_location_is_matched_literally() {
        let rule = rule(&["Atlantis"], None);
        assert_eq!(rule.targets, vec![LocationTarget::Literal("atlantis".to_string())]);
        assert!(rule.matches(&record(" atlantis ", false)));
        assert!(!rule.matches(&record("Atlantis City", false)));
    }

    #[test]
    fn no_location_selection_yields_no_stage() {
        let criteria = FilterCriteria::default();
        assert!(LocationRule::from_criteria(&criteria, &Classification::default()).is_none());

        let predicate = compose(&criteria, &Snapshot::default(), &Classification::default());
        assert_eq!(predicate.stage_names(), vec!["visible"]);
    }

    #[test]
    fn unresolved_technology_composes_an_empty_predicate() {
        let criteria = FilterCriteria {
            technology: Some("cobol".to_string()),
            ..Default::default()
        };
        let predicate = compose(&criteria, &Snapshot::default(), &Classification::default());
        assert!(predicate.stages().contains(&Stage::UnknownTechnology));
        assert!(!predicate.matches(&record("Sofia", false)));
    }

    #[test]
    fn excluding_location_also_clears_remote() {
        let criteria = FilterCriteria {
            locations: ["Sofia".to_string()].into_iter().collect(),
            remote: Some(true),
            seniorities: ["Senior".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let cleared = criteria.without(FacetDimension::Location);
        assert!(cleared.locations.is_empty());
        assert_eq!(cleared.remote, None);
        assert_eq!(cleared.seniorities, criteria.seniorities);
    }
}
