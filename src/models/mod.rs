pub mod category;
pub mod company;
pub mod posting;
pub mod posting_technology;
pub mod technology;
