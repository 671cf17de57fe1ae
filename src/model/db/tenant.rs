use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::storage::Id;

/// An organization owning members, commissions and surveys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    /// URL-friendly unique name.
    pub slug: String,
    /// The nomination year currently being prepared.
    pub current_year: i32,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(name: String, slug: String, current_year: i32) -> Self {
        Self {
            id: Id::new(),
            name,
            slug,
            current_year,
            created_at: Utc::now(),
        }
    }
}
