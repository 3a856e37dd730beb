use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::search_dto::FacetCountResponse;
use crate::services::company_stats_service::{CompanyAggregates, SizeBucketCount};
use crate::services::section_service::{CategorySection, SectionRequest, TechCount};

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(default)]
pub struct SectionQuery {
    pub take_techs: Option<i64>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    pub remote: Option<bool>,
}

impl From<SectionQuery> for SectionRequest {
    fn from(value: SectionQuery) -> Self {
        Self {
            take_techs: value.take_techs,
            location: value.location,
            remote: value.remote,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionTechResponse {
    pub tech_id: Uuid,
    pub tech_name: String,
    pub tech_slug: String,
    pub logo_url: Option<String>,
    pub jobs_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResponse {
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
    pub icon_url: Option<String>,
    pub jobs_count: usize,
    pub techs: Vec<SectionTechResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompanyAggregatesQuery {
    pub only_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeBucketResponse {
    pub bucket: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAggregatesResponse {
    pub size_histogram: Vec<SizeBucketResponse>,
    pub location_histogram: Vec<FacetCountResponse>,
}

impl From<TechCount> for SectionTechResponse {
    fn from(value: TechCount) -> Self {
        Self {
            tech_id: value.technology.id,
            tech_name: value.technology.name,
            tech_slug: value.technology.slug,
            logo_url: value.technology.logo_url,
            jobs_count: value.jobs_count,
        }
    }
}

impl From<CategorySection> for SectionResponse {
    fn from(value: CategorySection) -> Self {
        Self {
            category_id: value.category.id,
            category_name: value.category.name,
            category_slug: value.category.slug,
            icon_url: value.category.icon_url,
            jobs_count: value.jobs_count,
            techs: value.techs.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<SizeBucketCount> for SizeBucketResponse {
    fn from(value: SizeBucketCount) -> Self {
        Self {
            bucket: value.key,
            label: value.label,
            count: value.count,
        }
    }
}

impl From<CompanyAggregates> for CompanyAggregatesResponse {
    fn from(value: CompanyAggregates) -> Self {
        Self {
            size_histogram: value.size_histogram.into_iter().map(Into::into).collect(),
            location_histogram: value.location_histogram.into_iter().map(Into::into).collect(),
        }
    }
}
