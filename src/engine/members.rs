use mongodb::bson::Document;

use crate::error::{Error, Result};
use crate::model::{
    api::member::{MemberSpec, MemberUpdate},
    common::name,
    db::{Ballot, Member, Survey, SurveyVote, Tenant, Vote},
    storage::{Filter, Id, Store},
};

use super::required;

pub async fn create(store: &Store, tenant_id: Id, spec: MemberSpec) -> Result<Member> {
    store.get::<Tenant>(tenant_id).await?;
    let member = Member {
        eligible: spec.eligible,
        ..Member::new(tenant_id, required(&spec.full_name, "Member name")?)
    };
    let member = store.insert(&member).await?;
    debug!("Created member {} for tenant {tenant_id}", member.id);
    Ok(member)
}

/// A tenant's members in alphabetical order, optionally narrowed by a
/// name prefix.
pub async fn list(store: &Store, tenant_id: Id, search: Option<&str>) -> Result<Vec<Member>> {
    let mut members: Vec<Member> = store
        .find(&Filter::new().eq("tenant_id", tenant_id))
        .await?;
    members.sort_by(|a, b| name::compare(&a.full_name, &b.full_name).then_with(|| a.id.cmp(&b.id)));
    Ok(match search {
        Some(query) => name::prefix_search(members, query, |m| m.full_name.as_str()),
        None => members,
    })
}

/// Eligible members only, as offered on ballots and surveys.
pub async fn eligible(store: &Store, tenant_id: Id, search: Option<&str>) -> Result<Vec<Member>> {
    let mut members = list(store, tenant_id, None).await?;
    members.retain(|m| m.eligible);
    Ok(match search {
        Some(query) => name::prefix_search(members, query, |m| m.full_name.as_str()),
        None => members,
    })
}

pub async fn update(store: &Store, member_id: Id, update: MemberUpdate) -> Result<Member> {
    store.get::<Member>(member_id).await?;

    let mut patch = Document::new();
    if let Some(full_name) = update.full_name {
        patch.insert("full_name", required(&full_name, "Member name")?);
    }
    if let Some(eligible) = update.eligible {
        patch.insert("eligible", eligible);
    }
    if !patch.is_empty() {
        store.update::<Member>(&Filter::by_id(member_id), patch).await?;
    }
    store.get(member_id).await
}

/// Whether any vote, ballot or survey suggestion names the member.
async fn is_referenced(store: &Store, member: &Member) -> Result<bool> {
    let by_member = Filter::new().eq("member_id", member.id);
    if store.find_one::<Vote>(&by_member).await?.is_some()
        || store.find_one::<SurveyVote>(&by_member).await?.is_some()
        || store
            .find_one::<Ballot>(&Filter::new().eq("voter_id", member.id))
            .await?
            .is_some()
    {
        return Ok(true);
    }

    // Older survey rows list several members at once.
    let surveys: Vec<Survey> = store
        .find(&Filter::new().eq("tenant_id", member.tenant_id))
        .await?;
    if surveys.is_empty() {
        return Ok(false);
    }
    let rows: Vec<SurveyVote> = store
        .find(&Filter::new().one_of("survey_id", surveys.iter().map(|s| s.id)))
        .await?;
    Ok(rows.iter().any(|row| row.suggestions.contains(&member.id)))
}

/// Delete a member nobody has voted for or suggested. Referenced members
/// must be marked ineligible instead.
pub async fn delete(store: &Store, member_id: Id) -> Result<()> {
    let member: Member = store.get(member_id).await?;
    if is_referenced(store, &member).await? {
        return Err(Error::precondition(format!(
            "{} has recorded votes or suggestions; mark them ineligible instead",
            member.full_name
        )));
    }
    store.delete::<Member>(&Filter::by_id(member_id)).await?;
    debug!("Deleted member {member_id}");
    Ok(())
}
