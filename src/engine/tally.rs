//! Per-role vote counts, recomputed from the stored ballots on every call.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::model::{
    api::results::{CommissionResults, MemberCount, RoleTally},
    common::name,
    db::{Ballot, Commission, Member, Role, Vote},
    storage::{Filter, Id, Store},
};

pub const UNKNOWN_MEMBER: &str = "unknown member";
pub const UNKNOWN_ROLE: &str = "unknown role";

/// Order by descending count, then alphabetically by name, then by ID.
pub(crate) fn by_count_then_name(a: &MemberCount, b: &MemberCount) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| name::compare(&a.name, &b.name))
        .then_with(|| a.member_id.cmp(&b.member_id))
}

/// Count the votes for each role that received at least one ballot.
///
/// Roles come out in display order, with roles that no longer exist last.
/// The result does not depend on the order of the input rows.
pub fn tally(roles: &[Role], ballots: &[Ballot], votes: &[Vote], members: &[Member]) -> Vec<RoleTally> {
    let role_of_ballot: HashMap<Id, Id> = ballots.iter().map(|b| (b.id, b.role_id)).collect();
    let mut ballots_per_role: HashMap<Id, u32> = HashMap::new();
    for ballot in ballots {
        *ballots_per_role.entry(ballot.role_id).or_default() += 1;
    }

    let mut counts: HashMap<Id, HashMap<Id, u32>> = HashMap::new();
    for vote in votes {
        if let Some(role_id) = role_of_ballot.get(&vote.ballot_id) {
            *counts
                .entry(*role_id)
                .or_default()
                .entry(vote.member_id)
                .or_default() += 1;
        }
    }

    let roles: HashMap<Id, &Role> = roles.iter().map(|r| (r.id, r)).collect();
    let names: HashMap<Id, &str> = members
        .iter()
        .map(|m| (m.id, m.full_name.as_str()))
        .collect();

    let mut tallies: Vec<RoleTally> = ballots_per_role
        .into_iter()
        .map(|(role_id, ballots)| {
            let mut votes: Vec<MemberCount> = counts
                .remove(&role_id)
                .unwrap_or_default()
                .into_iter()
                .map(|(member_id, count)| MemberCount {
                    member_id: member_id.into(),
                    name: names.get(&member_id).unwrap_or(&UNKNOWN_MEMBER).to_string(),
                    count,
                })
                .collect();
            votes.sort_by(by_count_then_name);

            let role = roles.get(&role_id);
            RoleTally {
                role_id: role_id.into(),
                role_name: role.map_or(UNKNOWN_ROLE, |r| r.name.as_str()).to_string(),
                order: role.map(|r| r.order),
                ballots,
                votes,
            }
        })
        .collect();

    tallies.sort_by(|a, b| {
        let position = |t: &RoleTally| (t.order.is_none(), t.order.unwrap_or(u32::MAX));
        position(a)
            .cmp(&position(b))
            .then_with(|| name::compare(&a.role_name, &b.role_name))
            .then_with(|| a.role_id.cmp(&b.role_id))
    });
    tallies
}

/// Load everything recorded for a commission and tally it.
pub async fn commission_results(store: &Store, commission: &Commission) -> Result<CommissionResults> {
    let scope = Filter::new().eq("commission_id", commission.id);
    let roles: Vec<Role> = store.find(&scope).await?;
    let ballots: Vec<Ballot> = store.find(&scope).await?;
    let votes: Vec<Vote> = store.find(&scope).await?;
    let members: Vec<Member> = store
        .find(&Filter::new().eq("tenant_id", commission.tenant_id))
        .await?;
    debug!(
        "Tallying commission {}: {} ballots, {} votes",
        commission.id,
        ballots.len(),
        votes.len()
    );

    let submissions = ballots
        .iter()
        .map(|b| b.signature.as_str())
        .collect::<HashSet<_>>()
        .len();

    Ok(CommissionResults {
        commission_id: commission.id.into(),
        commission_name: commission.name.clone(),
        year: commission.year,
        status: commission.status,
        finalized_at: commission.finalized_at.map(|at| at.to_chrono()),
        submissions,
        roles: tally(&roles, &ballots, &votes, &members),
    })
}
