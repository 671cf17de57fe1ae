use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::{
    api::id::ApiId,
    common::SurveyStatus,
    db::{Survey, SurveyItem},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyItemSpec {
    pub role_name: String,
    pub max_suggestions: u32,
}

/// A new survey with its items, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySpec {
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<SurveyItemSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyItemDescription {
    pub id: ApiId,
    pub role_name: String,
    pub max_suggestions: u32,
    pub order: u32,
}

impl From<SurveyItem> for SurveyItemDescription {
    fn from(item: SurveyItem) -> Self {
        Self {
            id: item.id.into(),
            role_name: item.role_name,
            max_suggestions: item.max_suggestions,
            order: item.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDescription {
    pub id: ApiId,
    pub tenant_id: ApiId,
    pub title: String,
    pub year: i32,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub link_code: String,
    pub items: Vec<SurveyItemDescription>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_link: Option<String>,
}

impl SurveyDescription {
    pub fn new(survey: Survey, items: Vec<SurveyItem>) -> Self {
        Self {
            id: survey.id.into(),
            tenant_id: survey.tenant_id.into(),
            title: survey.title,
            year: survey.year,
            description: survey.description,
            status: survey.status,
            link_code: survey.link_code,
            items: items.into_iter().map(Into::into).collect(),
            created_at: survey.created_at,
            survey_link: None,
        }
    }

    /// Attach the public survey link.
    pub fn with_link(mut self, config: &Config) -> Self {
        self.survey_link = Some(config.survey_link(&self.link_code));
        self
    }
}

/// How many suggestions a survey submission recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionReceipt {
    pub suggestions: usize,
}

/// Suggested members per survey item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub suggestions: HashMap<ApiId, Vec<ApiId>>,
}
