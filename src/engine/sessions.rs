//! The public voting session: a commission's active roles, presented one
//! at a time with their candidates.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{
    api::{
        member::MemberDescription,
        voting::{BallotPaper, BallotRole, RolePage, SurveyPaper},
    },
    common::SurveyStatus,
    db::{Commission, Role, Survey, SurveyVote},
    storage::{Filter, Id, Store},
};

use super::{members, ranking, roles, submission::ensure_open, surveys};

fn ballot_roles(roles: Vec<Role>) -> Vec<BallotRole> {
    roles
        .into_iter()
        .zip(1..)
        .map(|(role, position)| BallotRole {
            position,
            role_id: role.id.into(),
            name: role.name,
            max_selections: role.max_selections,
        })
        .collect()
}

/// The roles a voter will be asked about, in order.
pub async fn ballot_paper(store: &Store, commission: &Commission) -> Result<BallotPaper> {
    ensure_open(commission)?;
    let roles = roles::list(store, commission.id, false).await?;
    Ok(BallotPaper {
        commission_name: commission.name.clone(),
        year: commission.year,
        anonymity: commission.anonymity,
        roles: ballot_roles(roles),
    })
}

/// Suggestion counts from the linked survey for one role name.
async fn survey_counts(store: &Store, commission: &Commission, role_name: &str) -> Result<HashMap<Id, u32>> {
    let Some(survey_id) = commission.survey_id else {
        return Ok(HashMap::new());
    };
    let votes: Vec<SurveyVote> = store
        .find(
            &Filter::new()
                .eq("survey_id", survey_id)
                .eq("role_name", role_name),
        )
        .await?;
    Ok(ranking::suggestion_counts(role_name, &votes))
}

/// One role of the session, with eligible candidates ranked by the linked
/// survey and optionally narrowed by a name prefix.
pub async fn role_page(
    store: &Store,
    commission: &Commission,
    position: u32,
    search: Option<&str>,
) -> Result<RolePage> {
    ensure_open(commission)?;
    let roles = roles::list(store, commission.id, false).await?;
    let total = roles.len() as u32;
    let role = ballot_roles(roles)
        .into_iter()
        .find(|r| r.position == position)
        .ok_or_else(|| Error::not_found(format!("Role at position {position}")))?;

    let counts = survey_counts(store, commission, &role.name).await?;
    let candidates = members::eligible(store, commission.tenant_id, search).await?;
    Ok(RolePage {
        previous: (position > 1).then(|| position - 1),
        next: (position < total).then(|| position + 1),
        total,
        candidates: ranking::rank_candidates(candidates, &counts),
        role,
    })
}

/// A survey's items and the members who may be suggested.
pub async fn survey_paper(store: &Store, survey: Survey) -> Result<SurveyPaper> {
    if survey.status != SurveyStatus::Open {
        return Err(Error::precondition(format!("Survey {} is closed", survey.id)));
    }
    let items = surveys::items(store, survey.id).await?;
    let members = members::eligible(store, survey.tenant_id, None).await?;
    Ok(SurveyPaper {
        title: survey.title,
        year: survey.year,
        description: survey.description,
        items: items.into_iter().map(Into::into).collect(),
        members: members.into_iter().map(MemberDescription::from).collect(),
    })
}
