use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::storage::Id;

/// One submission's choices for one role. Never stored without votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    #[serde(rename = "_id")]
    pub id: Id,
    pub commission_id: Id,
    pub role_id: Id,
    /// Shared by every ballot of the same submission.
    pub signature: String,
    /// Always `None` for anonymous commissions.
    pub voter_id: Option<Id>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Ballot {
    pub fn new(commission_id: Id, role_id: Id, signature: String, voter_id: Option<Id>) -> Self {
        Self {
            id: Id::new(),
            commission_id,
            role_id,
            signature,
            voter_id,
            created_at: Utc::now(),
        }
    }
}

/// A single selected member on a ballot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    pub ballot_id: Id,
    pub member_id: Id,
    pub commission_id: Id,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(ballot: &Ballot, member_id: Id) -> Self {
        Self {
            id: Id::new(),
            ballot_id: ballot.id,
            member_id,
            commission_id: ballot.commission_id,
            created_at: Utc::now(),
        }
    }
}
