use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{api::id::ApiId, common::CommissionStatus};

/// How many times a member was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCount {
    pub member_id: ApiId,
    pub name: String,
    pub count: u32,
}

/// Results for a single role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTally {
    pub role_id: ApiId,
    pub role_name: String,
    /// Display position, `None` if the role no longer exists.
    pub order: Option<u32>,
    /// Ballots cast for the role.
    pub ballots: u32,
    /// Members by descending count.
    pub votes: Vec<MemberCount>,
}

/// Full results of a commission, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResults {
    pub commission_id: ApiId,
    pub commission_name: String,
    pub year: i32,
    pub status: CommissionStatus,
    pub finalized_at: Option<DateTime<Utc>>,
    /// Distinct submissions received.
    pub submissions: usize,
    pub roles: Vec<RoleTally>,
}

/// Ranked suggestions for one survey item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRanking {
    pub item_id: ApiId,
    pub role_name: String,
    pub candidates: Vec<MemberCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResults {
    pub survey_id: ApiId,
    pub title: String,
    pub year: i32,
    /// Stored suggestion rows: one per suggested member, or one per
    /// legacy record listing several.
    pub suggestion_rows: usize,
    pub items: Vec<ItemRanking>,
}
