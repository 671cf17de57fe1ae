use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Config;
use crate::model::{
    api::id::ApiId,
    common::{AnonymityMode, CommissionStatus},
    db::Commission,
};

/// A new commission, as specified by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSpec {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub anonymity: AnonymityMode,
    #[serde(default)]
    pub survey_id: Option<ApiId>,
    /// Start with the standard role set.
    #[serde(default)]
    pub default_roles: bool,
}

/// Distinguish an absent field from an explicit `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Changes to a commission's settings. Absent fields are left alone;
/// `description` and `survey_id` may be cleared with `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub anonymity: Option<AnonymityMode>,
    #[serde(default, deserialize_with = "present")]
    pub survey_id: Option<Option<ApiId>>,
}

/// An API-friendly commission description. The pending finalization key is
/// never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionDescription {
    pub id: ApiId,
    pub tenant_id: ApiId,
    pub name: String,
    pub description: Option<String>,
    pub year: i32,
    pub status: CommissionStatus,
    pub anonymity: AnonymityMode,
    pub link_code: String,
    pub survey_id: Option<ApiId>,
    pub finalization_key: Option<String>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_link: Option<String>,
}

impl CommissionDescription {
    /// Attach the public voting link.
    pub fn with_link(mut self, config: &Config) -> Self {
        self.voting_link = Some(config.commission_link(&self.link_code));
        self
    }
}

impl From<Commission> for CommissionDescription {
    fn from(commission: Commission) -> Self {
        Self {
            id: commission.id.into(),
            tenant_id: commission.tenant_id.into(),
            name: commission.name,
            description: commission.description,
            year: commission.year,
            status: commission.status,
            anonymity: commission.anonymity,
            link_code: commission.link_code,
            survey_id: commission.survey_id.map(ApiId::from),
            finalization_key: commission.finalization_key,
            finalized_at: commission.finalized_at.map(|at| at.to_chrono()),
            created_at: commission.created_at,
            voting_link: None,
        }
    }
}

/// A freshly issued finalization key, to be shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationChallenge {
    pub commission_id: ApiId,
    pub key: String,
}

/// The operator's confirmation of a finalization key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationConfirm {
    pub key: String,
    /// The operator accepted that finalization cannot be undone.
    #[serde(default)]
    pub acknowledged: bool,
}

#[cfg(test)]
mod examples {
    use super::*;

    impl CommissionSpec {
        pub fn example1() -> Self {
            Self {
                name: "Nominating Committee".to_string(),
                year: 2025,
                description: Some("Nominations for the coming year".to_string()),
                anonymity: AnonymityMode::Anonymous,
                survey_id: None,
                default_roles: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::from_str;

    use super::*;

    #[test]
    fn settings_distinguish_null_from_absent() {
        let settings: CommissionSettings = from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(settings.description, Some(None));
        assert_eq!(settings.survey_id, None);

        let settings: CommissionSettings = from_str(r#"{"name": "New"}"#).unwrap();
        assert_eq!(settings.description, None);
        assert_eq!(settings.name.as_deref(), Some("New"));
    }
}
