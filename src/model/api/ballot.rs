use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::api::id::ApiId;

/// One voter's choices: the members selected for each role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub selections: HashMap<ApiId, Vec<ApiId>>,
    /// The member voting, where the commission records it.
    #[serde(default)]
    pub voter_id: Option<ApiId>,
}

/// Confirmation of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Shared by every ballot written for the submission.
    pub signature: String,
    pub ballots: usize,
    pub votes: usize,
}
