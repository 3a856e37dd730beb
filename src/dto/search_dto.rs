use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::technology::Technology;
use crate::services::facet_service::{FacetCount, FacetSet};
use crate::services::normalization::{parse_multi_select, parse_salary_band, SalaryBand};
use crate::services::predicate::FilterCriteria;
use crate::services::search_service::{PageRequest, SearchPage, SearchSort};
use crate::services::snapshot::JobRecord;

/// Query string shared by the search and facet endpoints. Multi-select
/// parameters are comma separated.
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(default)]
pub struct JobSearchQuery {
    #[validate(length(max = 200))]
    pub q: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub tech: Option<String>,
    #[validate(length(max = 500))]
    pub locations: Option<String>,
    #[validate(length(max = 500))]
    pub seniority: Option<String>,
    #[validate(length(max = 500))]
    pub job_types: Option<String>,
    #[validate(length(max = 500))]
    pub salary: Option<String>,
    pub remote: Option<bool>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl JobSearchQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            query: self.q.clone(),
            category: self.category.clone(),
            technology: self.tech.clone(),
            locations: parse_multi_select(self.locations.as_deref()),
            seniorities: parse_multi_select(self.seniority.as_deref()),
            job_types: parse_multi_select(self.job_types.as_deref()),
            salary_bands: parse_multi_select(self.salary.as_deref()),
            remote: self.remote,
        }
    }

    pub fn sort(&self) -> SearchSort {
        SearchSort::parse(self.sort.as_deref())
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::clamped(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingCardResponse {
    pub id: Uuid,
    pub title: String,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub location: Option<String>,
    pub is_remote: bool,
    pub job_type: Option<String>,
    pub seniority: Option<String>,
    pub salary_band: Option<String>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub category_slug: Option<String>,
    pub published_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub technologies: Vec<TechnologyResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub page: i64,
    pub page_size: i64,
}

pub type PostingPageResponse = PagedResponse<PostingCardResponse>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetCountResponse {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRangeResponse {
    pub min: u32,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetSetResponse {
    pub locations: Vec<FacetCountResponse>,
    pub seniorities: Vec<FacetCountResponse>,
    pub job_types: Vec<FacetCountResponse>,
    pub salary_bands: Vec<FacetCountResponse>,
    pub salary_range: Option<SalaryRangeResponse>,
}

impl From<Technology> for TechnologyResponse {
    fn from(value: Technology) -> Self {
        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
            logo_url: value.logo_url,
        }
    }
}

impl From<JobRecord> for PostingCardResponse {
    fn from(value: JobRecord) -> Self {
        let band = value
            .posting
            .salary_band
            .as_deref()
            .and_then(parse_salary_band);
        let published_at = value.posting.listed_at();
        let (company_name, company_logo_url) = match value.company {
            Some(company) => (Some(company.name), company.logo_url),
            None => (None, None),
        };

        Self {
            id: value.posting.id,
            title: value.posting.title,
            company_id: value.posting.company_id,
            company_name,
            company_logo_url,
            location: value.posting.location,
            is_remote: value.posting.is_remote,
            job_type: value.posting.job_type,
            seniority: value.posting.seniority,
            salary_band: value.posting.salary_band,
            salary_min: band.map(|b| b.min),
            salary_max: band.and_then(|b| b.max),
            category_slug: value.category.map(|c| c.slug),
            published_at,
            deadline: value.posting.deadline,
            technologies: value.technologies.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<SearchPage> for PagedResponse<PostingCardResponse> {
    fn from(value: SearchPage) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total_items: value.total_items,
            total_pages: value.total_pages,
            page: value.page,
            page_size: value.page_size,
        }
    }
}

impl From<FacetCount> for FacetCountResponse {
    fn from(value: FacetCount) -> Self {
        Self {
            value: value.value,
            count: value.count,
        }
    }
}

impl From<SalaryBand> for SalaryRangeResponse {
    fn from(value: SalaryBand) -> Self {
        Self {
            min: value.min,
            max: value.max,
        }
    }
}

impl From<FacetSet> for FacetSetResponse {
    fn from(value: FacetSet) -> Self {
        Self {
            locations: value.locations.into_iter().map(Into::into).collect(),
            seniorities: value.seniorities.into_iter().map(Into::into).collect(),
            job_types: value.job_types.into_iter().map(Into::into).collect(),
            salary_bands: value.salary_bands.into_iter().map(Into::into).collect(),
            salary_range: value.salary_range.map(Into::into),
        }
    }
}
