pub mod company_stats_service;
pub mod facet_service;
pub mod normalization;
pub mod predicate;
pub mod search_service;
pub mod section_service;
pub mod snapshot;
