use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    /// Free-text employee count such as "10-30" or "50+".
    pub size: Option<String>,
    pub is_active: bool,
}
