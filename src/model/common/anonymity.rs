use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use crate::model::storage::Id;

/// How a commission treats the identity of the person voting.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnonymityMode {
    /// Ballots never record a voter.
    #[default]
    Anonymous,
    /// Voters may identify themselves.
    OptionalIdentification,
    /// Voters must identify themselves, and may vote once per role.
    RequiredIdentification,
}

impl AnonymityMode {
    /// The voter to record on a ballot, given what the voter supplied.
    /// `None` inside `Ok` means the ballot stays anonymous.
    pub fn voter_to_record(self, supplied: Option<Id>) -> Result<Option<Id>, &'static str> {
        match (self, supplied) {
            (Self::Anonymous, _) => Ok(None),
            (Self::OptionalIdentification, voter) => Ok(voter),
            (Self::RequiredIdentification, Some(voter)) => Ok(Some(voter)),
            (Self::RequiredIdentification, None) => {
                Err("this commission requires voters to identify themselves")
            }
        }
    }
}

impl From<AnonymityMode> for Bson {
    fn from(mode: AnonymityMode) -> Self {
        to_bson(&mode).expect("Serialisation is infallible")
    }
}
