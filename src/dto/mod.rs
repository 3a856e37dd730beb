pub mod search_dto;
pub mod section_dto;
