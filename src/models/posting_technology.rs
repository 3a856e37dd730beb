use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Raw link row. Newer rows reference the catalogue, legacy rows only carry a name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostingTechnologyRow {
    pub posting_id: Uuid,
    pub technology_id: Option<Uuid>,
    pub technology_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechnologyRef {
    Resolved(Uuid),
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingTechnology {
    pub posting_id: Uuid,
    pub technology: TechnologyRef,
}

impl PostingTechnologyRow {
    pub fn resolved(posting_id: Uuid, technology_id: Uuid) -> Self {
        Self {
            posting_id,
            technology_id: Some(technology_id),
            technology_name: None,
        }
    }

    pub fn unresolved(posting_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            posting_id,
            technology_id: None,
            technology_name: Some(name.into()),
        }
    }

    /// The reference wins over the name; rows with neither are dropped.
    pub fn into_link(self) -> Option<PostingTechnology> {
        let technology = match (self.technology_id, self.technology_name) {
            (Some(id), _) => TechnologyRef::Resolved(id),
            (None, Some(name)) if !name.trim().is_empty() => {
                TechnologyRef::Unresolved(name.trim().to_string())
            }
            _ => return None,
        };
        Some(PostingTechnology {
            posting_id: self.posting_id,
            technology,
        })
    }
}
