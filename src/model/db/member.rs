use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::storage::Id;

/// A person who may be nominated, suggested, or identify as a voter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: Id,
    pub tenant_id: Id,
    pub full_name: String,
    /// Only eligible members appear on ballots and may be selected.
    pub eligible: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(tenant_id: Id, full_name: String) -> Self {
        Self {
            id: Id::new(),
            tenant_id,
            full_name,
            eligible: true,
            created_at: Utc::now(),
        }
    }
}
