use serde::{Deserialize, Serialize};

use crate::model::{api::id::ApiId, db::Member};

fn default_eligible() -> bool {
    true
}

/// A new member of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSpec {
    pub full_name: String,
    #[serde(default = "default_eligible")]
    pub eligible: bool,
}

/// Changes to an existing member. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub full_name: Option<String>,
    pub eligible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescription {
    pub id: ApiId,
    pub full_name: String,
    pub eligible: bool,
}

impl From<Member> for MemberDescription {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.into(),
            full_name: member.full_name,
            eligible: member.eligible,
        }
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl MemberSpec {
        pub fn example(full_name: &str) -> Self {
            Self {
                full_name: full_name.to_string(),
                eligible: true,
            }
        }
    }
}
