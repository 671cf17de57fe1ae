use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::SurveyStatus, storage::Id};

/// A suggestion-collection form, usually run before a commission meets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(rename = "_id")]
    pub id: Id,
    pub tenant_id: Id,
    pub title: String,
    pub year: i32,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub link_code: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// A role for which a survey collects suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyItem {
    #[serde(rename = "_id")]
    pub id: Id,
    pub survey_id: Id,
    pub role_name: String,
    pub max_suggestions: u32,
    pub order: u32,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

fn one() -> u32 {
    1
}

/// Suggestions recorded against one survey item's role name.
///
/// Current rows name a single member; older rows list several members in
/// `suggestions`. Both are counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyVote {
    #[serde(rename = "_id")]
    pub id: Id,
    pub survey_id: Id,
    pub role_name: String,
    pub member_id: Option<Id>,
    #[serde(default = "one")]
    pub vote_count: u32,
    #[serde(default)]
    pub suggestions: Vec<Id>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl SurveyVote {
    pub fn new(survey_id: Id, role_name: String, member_id: Id) -> Self {
        Self {
            id: Id::new(),
            survey_id,
            role_name,
            member_id: Some(member_id),
            vote_count: 1,
            suggestions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Every member suggested by this row, with how many times.
    pub fn counts(&self) -> impl Iterator<Item = (Id, u32)> + '_ {
        self.member_id
            .map(|member| (member, self.vote_count))
            .into_iter()
            .chain(self.suggestions.iter().map(|&member| (member, 1)))
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl SurveyVote {
        /// A row in the older multi-suggestion shape.
        pub fn example_legacy(survey_id: Id, role_name: &str, suggestions: Vec<Id>) -> Self {
            Self {
                id: Id::new(),
                survey_id,
                role_name: role_name.to_string(),
                member_id: None,
                vote_count: 1,
                suggestions,
                created_at: Utc::now(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{self, doc, oid::ObjectId, DateTime as BsonDateTime};

    use super::*;

    #[test]
    fn counts_both_shapes() {
        let (a, b) = (Id::new(), Id::new());
        let current = SurveyVote {
            vote_count: 3,
            ..SurveyVote::new(Id::new(), "Elders".to_string(), a)
        };
        assert_eq!(current.counts().collect::<Vec<_>>(), vec![(a, 3)]);

        let legacy = SurveyVote::example_legacy(Id::new(), "Elders", vec![a, b]);
        assert_eq!(legacy.counts().collect::<Vec<_>>(), vec![(a, 1), (b, 1)]);
    }

    #[test]
    fn legacy_rows_deserialise() {
        let member = ObjectId::new();
        let row = doc! {
            "_id": ObjectId::new(),
            "survey_id": ObjectId::new(),
            "role_name": "Deacons",
            "suggestions": [member],
            "created_at": BsonDateTime::now(),
        };
        let vote: SurveyVote = bson::from_document(row).unwrap();
        assert_eq!(vote.member_id, None);
        assert_eq!(vote.vote_count, 1);
        assert_eq!(vote.suggestions, vec![Id::from(member)]);
    }
}
