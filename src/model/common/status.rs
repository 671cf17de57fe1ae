use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// States in the commission lifecycle. Transitions only move forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    /// Being set up; roles and settings may change, no voting yet.
    Draft,
    /// Accepting ballots.
    Open,
    /// Results are final. Nothing about the commission may change.
    Finalized,
}

impl CommissionStatus {
    /// Statuses in which roles and settings may still be edited.
    pub const EDITABLE: [CommissionStatus; 2] = [Self::Draft, Self::Open];
}

impl From<CommissionStatus> for Bson {
    fn from(status: CommissionStatus) -> Self {
        to_bson(&status).expect("Serialisation is infallible")
    }
}

/// Whether a survey accepts suggestions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    Open,
    Closed,
}

impl From<SurveyStatus> for Bson {
    fn from(status: SurveyStatus) -> Self {
        to_bson(&status).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialise_lowercase() {
        assert_eq!(Bson::from(CommissionStatus::Finalized), Bson::from("finalized"));
        assert_eq!(Bson::from(SurveyStatus::Closed), Bson::from("closed"));
    }
}
