//! Suggestion surveys: creation, status, public submissions and results.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use mongodb::bson::doc;

use crate::error::{Error, Result};
use crate::model::{
    api::{
        results::{ItemRanking, SurveyResults},
        survey::{SurveyDescription, SurveySpec, SurveySubmission},
    },
    common::SurveyStatus,
    db::{Member, Survey, SurveyItem, SurveyVote, Tenant},
    storage::{Commit, Filter, Id, Store, WriteBatch},
};

use super::{link_code, optional, ranking, required};

/// Create an open survey together with its items.
pub async fn create(store: &Store, tenant_id: Id, spec: SurveySpec) -> Result<SurveyDescription> {
    store.get::<Tenant>(tenant_id).await?;
    let title = required(&spec.title, "Survey title")?;
    let code = link_code::unique::<Survey>(store, link_code::survey_code).await?;
    let survey = Survey {
        id: Id::new(),
        tenant_id,
        title,
        year: spec.year,
        description: optional(spec.description),
        status: SurveyStatus::Open,
        link_code: code,
        created_at: Utc::now(),
    };

    let mut names = HashSet::new();
    let mut items = Vec::with_capacity(spec.items.len());
    for (item, order) in spec.items.into_iter().zip(1..) {
        let role_name = required(&item.role_name, "Survey item role name")?;
        if item.max_suggestions == 0 {
            return Err(Error::invalid(format!(
                "{role_name} must allow at least one suggestion"
            )));
        }
        if !names.insert(role_name.clone()) {
            return Err(Error::invalid(format!("{role_name} appears more than once")));
        }
        items.push(SurveyItem {
            id: Id::new(),
            survey_id: survey.id,
            role_name,
            max_suggestions: item.max_suggestions,
            order,
            created_at: Utc::now(),
        });
    }

    let batch = WriteBatch::new()
        .insert(std::slice::from_ref(&survey))?
        .insert(&items)?;
    store.commit(batch).await?;
    info!("Created survey {} ({}) for tenant {tenant_id}", survey.id, survey.link_code);
    Ok(SurveyDescription::new(survey, items))
}

pub async fn items(store: &Store, survey_id: Id) -> Result<Vec<SurveyItem>> {
    let mut items: Vec<SurveyItem> = store
        .find(&Filter::new().eq("survey_id", survey_id))
        .await?;
    items.sort_by_key(|item| (item.order, item.id));
    Ok(items)
}

pub async fn describe(store: &Store, survey: Survey) -> Result<SurveyDescription> {
    let items = items(store, survey.id).await?;
    Ok(SurveyDescription::new(survey, items))
}

pub async fn list(store: &Store, tenant_id: Id) -> Result<Vec<Survey>> {
    let mut surveys: Vec<Survey> = store
        .find(&Filter::new().eq("tenant_id", tenant_id))
        .await?;
    surveys.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.title.cmp(&b.title)));
    Ok(surveys)
}

pub async fn by_link_code(store: &Store, code: &str) -> Result<Survey> {
    store
        .find_one(&Filter::new().eq("link_code", code.trim().to_uppercase()))
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey with link code {code}")))
}

/// Close a survey to suggestions, or reopen it.
pub async fn set_status(store: &Store, survey_id: Id, status: SurveyStatus) -> Result<Survey> {
    store.get::<Survey>(survey_id).await?;
    store
        .update::<Survey>(&Filter::by_id(survey_id), doc! {"status": status})
        .await?;
    info!("Survey {survey_id} is now {status:?}");
    store.get(survey_id).await
}

/// Record a member's suggestions. Empty items are skipped.
pub async fn submit(store: &Store, survey: &Survey, submission: SurveySubmission) -> Result<usize> {
    if survey.status != SurveyStatus::Open {
        return Err(Error::precondition(format!("Survey {} is closed", survey.id)));
    }
    let items: HashMap<Id, SurveyItem> = items(store, survey.id)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();
    let members: HashMap<Id, Member> = store
        .find::<Member>(&Filter::new().eq("tenant_id", survey.tenant_id))
        .await?
        .into_iter()
        .map(|member| (member.id, member))
        .collect();

    let mut rows = Vec::new();
    for (item_id, suggested) in &submission.suggestions {
        if suggested.is_empty() {
            continue;
        }
        let item = items
            .get(&**item_id)
            .ok_or_else(|| Error::invalid(format!("Item {item_id} is not part of this survey")))?;
        if suggested.len() as u32 > item.max_suggestions {
            return Err(Error::invalid(format!(
                "{} allows at most {} suggestion(s)",
                item.role_name, item.max_suggestions
            )));
        }
        let mut seen = HashSet::new();
        for member_id in suggested {
            let member = members
                .get(&**member_id)
                .ok_or_else(|| Error::not_found(format!("Member {member_id}")))?;
            if !member.eligible {
                return Err(Error::invalid(format!(
                    "{} is not eligible for suggestion",
                    member.full_name
                )));
            }
            if !seen.insert(member.id) {
                return Err(Error::invalid(format!(
                    "{} is suggested more than once for {}",
                    member.full_name, item.role_name
                )));
            }
            rows.push(SurveyVote::new(survey.id, item.role_name.clone(), member.id));
        }
    }
    if rows.is_empty() {
        return Err(Error::invalid("Nothing to submit"));
    }

    let batch = WriteBatch::new()
        .require::<Survey>(Filter::by_id(survey.id).eq("status", SurveyStatus::Open))
        .insert(&rows)?;
    match store.commit(batch).await? {
        Commit::Applied => {
            debug!("Recorded {} suggestions for survey {}", rows.len(), survey.id);
            Ok(rows.len())
        }
        Commit::Rejected { .. } => Err(Error::precondition(format!(
            "Survey {} closed before the suggestions were saved",
            survey.id
        ))),
    }
}

/// Suggestions per item, most suggested members first.
pub async fn results(store: &Store, survey_id: Id) -> Result<SurveyResults> {
    let survey: Survey = store.get(survey_id).await?;
    let items = items(store, survey_id).await?;
    let votes: Vec<SurveyVote> = store
        .find(&Filter::new().eq("survey_id", survey_id))
        .await?;
    let members: Vec<Member> = store
        .find(&Filter::new().eq("tenant_id", survey.tenant_id))
        .await?;

    let items = items
        .into_iter()
        .map(|item| ItemRanking {
            candidates: ranking::ranked_suggestions(
                ranking::suggestion_counts(&item.role_name, &votes),
                &members,
            ),
            item_id: item.id.into(),
            role_name: item.role_name,
        })
        .collect();

    Ok(SurveyResults {
        survey_id: survey.id.into(),
        title: survey.title,
        year: survey.year,
        suggestion_rows: votes.len(),
        items,
    })
}
