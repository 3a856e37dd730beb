#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jobboard_backend::{
    config::EngineSettings,
    database::memory::MemoryStore,
    models::{
        category::Category, company::Company, posting::Posting,
        posting_technology::PostingTechnologyRow, technology::Technology,
    },
    services::{
        company_stats_service::CompanyStatsService, facet_service::FacetService,
        search_service::SearchService, section_service::SectionService,
    },
    AppState,
};
use uuid::Uuid;

pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, n, 9, 0, 0).unwrap()
}

pub fn company(name: &str) -> Company {
    Company {
        id: Uuid::new_v4(),
        name: name.to_string(),
        logo_url: Some(format!("https://cdn.example.com/{}.png", name.to_lowercase())),
        location: None,
        size: None,
        is_active: true,
    }
}

pub fn company_with(location: Option<&str>, size: Option<&str>, is_active: bool) -> Company {
    Company {
        location: location.map(str::to_string),
        size: size.map(str::to_string),
        is_active,
        ..company("Sized")
    }
}

pub fn technology(name: &str, slug: &str) -> Technology {
    Technology {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: slug.to_string(),
        logo_url: None,
    }
}

pub fn category(name: &str, slug: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: slug.to_string(),
        icon_url: None,
    }
}

pub fn posting(title: &str, location: &str, job_type: &str, company: &Company) -> Posting {
    Posting {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        location: Some(location.to_string()),
        is_remote: false,
        job_type: Some(job_type.to_string()),
        seniority: Some("Mid".to_string()),
        salary_band: Some("3000-5000".to_string()),
        status: "Active".to_string(),
        company_id: company.id,
        category_id: None,
        deadline: None,
        published_at: None,
        created_at: day(1),
    }
}

/// P1 (Sofia, Full-time, React), P2 (Remote, Internship, React + Node),
/// P3 (Varna, Full-time, Node).
pub struct Scenario {
    pub store: MemoryStore,
    pub p1: Posting,
    pub p2: Posting,
    pub p3: Posting,
    pub react: Technology,
    pub node: Technology,
}

pub fn scenario() -> Scenario {
    let acme = company("Acme");
    let react = technology("React", "react");
    let node = technology("Node.js", "nodejs");

    let p1 = Posting {
        seniority: Some("Senior".to_string()),
        created_at: day(3),
        ..posting("Frontend Engineer", "Sofia", "Full-time", &acme)
    };
    let p2 = Posting {
        is_remote: true,
        seniority: Some("Junior".to_string()),
        salary_band: Some("1000-2000".to_string()),
        created_at: day(2),
        ..posting("Fullstack Intern", "Remote", "Internship", &acme)
    };
    let p3 = Posting {
        created_at: day(1),
        ..posting("Backend Engineer", "Varna", "Full-time", &acme)
    };

    let store = MemoryStore::new()
        .with_company(acme)
        .with_technology(react.clone())
        .with_technology(node.clone())
        .with_posting(p1.clone())
        .with_posting(p2.clone())
        .with_posting(p3.clone())
        .with_link(PostingTechnologyRow::resolved(p1.id, react.id))
        .with_link(PostingTechnologyRow::resolved(p2.id, react.id))
        .with_link(PostingTechnologyRow::resolved(p2.id, node.id))
        .with_link(PostingTechnologyRow::resolved(p3.id, node.id));

    Scenario {
        store,
        p1,
        p2,
        p3,
        react,
        node,
    }
}

fn settings() -> Arc<EngineSettings> {
    Arc::new(EngineSettings::default())
}

pub fn search_service(store: MemoryStore) -> SearchService {
    SearchService::new(Arc::new(store), settings())
}

pub fn facet_service(store: MemoryStore) -> FacetService {
    FacetService::new(Arc::new(store), settings())
}

pub fn section_service(store: MemoryStore) -> SectionService {
    SectionService::new(Arc::new(store), settings())
}

pub fn company_stats_service(store: MemoryStore) -> CompanyStatsService {
    CompanyStatsService::new(Arc::new(store), settings())
}

pub fn app_state(store: MemoryStore) -> AppState {
    AppState::with_store(Arc::new(store), EngineSettings::default())
}
