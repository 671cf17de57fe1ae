//! Stored record types.
//!
//! IDs and datetimes are serialised in MongoDB's own format.

mod ballot;
mod commission;
mod member;
mod role;
mod survey;
mod tenant;

pub use ballot::{Ballot, Vote};
pub use commission::{rejection, Commission, CommissionScoped, CommissionWrite};
pub use member::Member;
pub use role::{default_roles, Role, DEFAULT_ROLES};
pub use survey::{Survey, SurveyItem, SurveyVote};
pub use tenant::Tenant;

use crate::model::storage::{Entity, Id, Unguarded, ID_FIELD};

// Tenant-level records.
impl Entity for Tenant {
    const NAME: &'static str = "tenants";
    const LABEL: &'static str = "Tenant";
}
impl Unguarded for Tenant {}

impl Entity for Member {
    const NAME: &'static str = "members";
    const LABEL: &'static str = "Member";
}
impl Unguarded for Member {}

// Commission records.
impl Entity for Commission {
    const NAME: &'static str = "commissions";
    const LABEL: &'static str = "Commission";
}
impl CommissionScoped for Commission {
    const SCOPE_FIELD: &'static str = ID_FIELD;
    fn commission_id(&self) -> Id {
        self.id
    }
}

impl Entity for Role {
    const NAME: &'static str = "commission_roles";
    const LABEL: &'static str = "Role";
}
impl CommissionScoped for Role {
    const SCOPE_FIELD: &'static str = "commission_id";
    fn commission_id(&self) -> Id {
        self.commission_id
    }
}

impl Entity for Ballot {
    const NAME: &'static str = "ballots";
    const LABEL: &'static str = "Ballot";
}
impl CommissionScoped for Ballot {
    const SCOPE_FIELD: &'static str = "commission_id";
    fn commission_id(&self) -> Id {
        self.commission_id
    }
}

impl Entity for Vote {
    const NAME: &'static str = "votes";
    const LABEL: &'static str = "Vote";
}
impl CommissionScoped for Vote {
    const SCOPE_FIELD: &'static str = "commission_id";
    fn commission_id(&self) -> Id {
        self.commission_id
    }
}

// Survey records.
impl Entity for Survey {
    const NAME: &'static str = "surveys";
    const LABEL: &'static str = "Survey";
}
impl Unguarded for Survey {}

impl Entity for SurveyItem {
    const NAME: &'static str = "survey_items";
    const LABEL: &'static str = "Survey item";
}
impl Unguarded for SurveyItem {}

impl Entity for SurveyVote {
    const NAME: &'static str = "survey_votes";
    const LABEL: &'static str = "Survey vote";
}
impl Unguarded for SurveyVote {}
