//! What voters see on the public voting surface.

use serde::{Deserialize, Serialize};

use crate::model::{
    api::{id::ApiId, member::MemberDescription, survey::SurveyItemDescription},
    common::AnonymityMode,
};

/// A role as presented to voters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotRole {
    /// 1-based position in the voting session.
    pub position: u32,
    pub role_id: ApiId,
    pub name: String,
    pub max_selections: u32,
}

/// The overview of a commission's voting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotPaper {
    pub commission_name: String,
    pub year: i32,
    pub anonymity: AnonymityMode,
    pub roles: Vec<BallotRole>,
}

/// A member offered on a ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ApiId,
    pub full_name: String,
    /// Times suggested in the linked survey.
    pub suggestions: u32,
}

/// One step of the voting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePage {
    pub role: BallotRole,
    /// Number of roles in the session.
    pub total: u32,
    pub previous: Option<u32>,
    pub next: Option<u32>,
    pub candidates: Vec<Candidate>,
}

/// A survey as presented to members making suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyPaper {
    pub title: String,
    pub year: i32,
    pub description: Option<String>,
    pub items: Vec<SurveyItemDescription>,
    pub members: Vec<MemberDescription>,
}
