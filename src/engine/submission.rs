//! Turning a voter's choices into ballots and votes.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::model::{
    api::ballot::{Submission, SubmissionReceipt},
    common::{AnonymityMode, CommissionStatus},
    db::{Ballot, Commission, CommissionWrite, Member, Role, Vote},
    storage::{Filter, Id, Store},
};

/// Choices being assembled for one submission. Every selection is checked
/// as it is made, so an invalid one is refused before anything is written.
#[derive(Debug)]
pub struct Selections<'a> {
    roles: HashMap<Id, &'a Role>,
    members: HashMap<Id, &'a Member>,
    chosen: HashMap<Id, Vec<Id>>,
}

impl<'a> Selections<'a> {
    /// Start a submission over the active roles and known members.
    pub fn new(roles: &'a [Role], members: &'a [Member]) -> Self {
        Self {
            roles: roles
                .iter()
                .filter(|r| r.active)
                .map(|r| (r.id, r))
                .collect(),
            members: members.iter().map(|m| (m.id, m)).collect(),
            chosen: HashMap::new(),
        }
    }

    /// Add a member to a role's selections.
    pub fn select(&mut self, role_id: Id, member_id: Id) -> Result<()> {
        let role = self
            .roles
            .get(&role_id)
            .ok_or_else(|| Error::invalid(format!("Role {role_id} is not open for voting")))?;
        let member = self
            .members
            .get(&member_id)
            .ok_or_else(|| Error::not_found(format!("Member {member_id}")))?;
        if !member.eligible {
            return Err(Error::invalid(format!(
                "{} is not eligible for selection",
                member.full_name
            )));
        }

        let chosen = self.chosen.entry(role_id).or_default();
        if chosen.contains(&member_id) {
            return Err(Error::invalid(format!(
                "{} is selected more than once for {}",
                member.full_name, role.name
            )));
        }
        if chosen.len() as u32 >= role.max_selections {
            return Err(Error::invalid(format!(
                "{} allows at most {} selection(s)",
                role.name, role.max_selections
            )));
        }
        chosen.push(member_id);
        Ok(())
    }

    /// Roles with at least one selection.
    pub fn roles(&self) -> impl Iterator<Item = Id> + '_ {
        self.chosen
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(role, _)| *role)
    }

    pub fn is_empty(&self) -> bool {
        self.roles().next().is_none()
    }

    /// One ballot per role with selections, and one vote per selected member.
    pub fn into_records(self, commission_id: Id, signature: &str, voter: Option<Id>) -> (Vec<Ballot>, Vec<Vote>) {
        let mut chosen: Vec<_> = self
            .chosen
            .into_iter()
            .filter(|(_, members)| !members.is_empty())
            .collect();
        chosen.sort_by_key(|(role, _)| self.roles.get(role).map(|r| r.order));

        let mut ballots = Vec::with_capacity(chosen.len());
        let mut votes = Vec::new();
        for (role_id, members) in chosen {
            let ballot = Ballot::new(commission_id, role_id, signature.to_string(), voter);
            votes.extend(members.into_iter().map(|member| Vote::new(&ballot, member)));
            ballots.push(ballot);
        }
        (ballots, votes)
    }
}

/// An opaque token shared by the ballots of one submission.
fn signature() -> String {
    format!(
        "ballot-{}-{:016x}",
        Utc::now().timestamp_millis(),
        rand::random::<u64>()
    )
}

/// Refuse anything but an open commission.
pub fn ensure_open(commission: &Commission) -> Result<()> {
    match commission.status {
        CommissionStatus::Open => Ok(()),
        CommissionStatus::Finalized => Err(Error::CommitteeFinalized(commission.id)),
        CommissionStatus::Draft => Err(Error::precondition(format!(
            "Commission {} is not open for voting",
            commission.id
        ))),
    }
}

/// Work out which voter, if any, the ballots should record.
fn resolve_voter(commission: &Commission, supplied: Option<Id>, members: &[Member]) -> Result<Option<Id>> {
    let Some(voter) = commission
        .anonymity
        .voter_to_record(supplied)
        .map_err(Error::invalid)?
    else {
        return Ok(None);
    };

    let member = members
        .iter()
        .find(|m| m.id == voter)
        .ok_or_else(|| Error::not_found(format!("Voter {voter}")))?;
    if commission.anonymity == AnonymityMode::RequiredIdentification && !member.eligible {
        return Err(Error::invalid(format!("{} may not vote", member.full_name)));
    }
    Ok(Some(voter))
}

/// Record a submission for an open commission.
///
/// Every ballot and vote is written in a single batch that only applies
/// while the commission is still open.
pub async fn submit(store: &Store, commission: &Commission, submission: Submission) -> Result<SubmissionReceipt> {
    ensure_open(commission)?;

    let roles: Vec<Role> = store
        .find(&Filter::new().eq("commission_id", commission.id))
        .await?;
    let members: Vec<Member> = store
        .find(&Filter::new().eq("tenant_id", commission.tenant_id))
        .await?;

    let mut selections = Selections::new(&roles, &members);
    for (role_id, chosen) in &submission.selections {
        for member_id in chosen {
            selections.select(**role_id, **member_id)?;
        }
    }
    if selections.is_empty() {
        return Err(Error::invalid("Nothing to submit"));
    }

    let voter = resolve_voter(commission, submission.voter_id.map(Id::from), &members)?;
    let mut write = CommissionWrite::new(commission.id, &[CommissionStatus::Open]);
    if let Some(voter) = voter.filter(|_| commission.anonymity == AnonymityMode::RequiredIdentification) {
        for role_id in selections.roles() {
            let role = roles.iter().find(|r| r.id == role_id);
            write = write.require_absent::<Ballot>(
                Filter::new().eq("role_id", role_id).eq("voter_id", voter),
                format!(
                    "Voter {voter} has already voted for {}",
                    role.map_or("this role", |r| r.name.as_str())
                ),
            );
        }
    }

    let signature = signature();
    let (ballots, votes) = selections.into_records(commission.id, &signature, voter);
    let receipt = SubmissionReceipt {
        signature: signature.clone(),
        ballots: ballots.len(),
        votes: votes.len(),
    };

    write
        .insert(&ballots)?
        .insert(&votes)?
        .commit(store)
        .await?;
    debug!(
        "Recorded submission {signature} for commission {}: {} ballots, {} votes",
        commission.id, receipt.ballots, receipt.votes
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Vec<Role>, Vec<Member>) {
        let commission = Id::new();
        let tenant = Id::new();
        let mut roles = vec![
            Role::new(commission, "Elders".to_string(), 2, 1),
            Role::new(commission, "Treasurer".to_string(), 1, 2),
            Role::new(commission, "Retired".to_string(), 1, 3),
        ];
        roles[2].active = false;
        let mut members = vec![
            Member::example(tenant, "Ana"),
            Member::example(tenant, "Bruno"),
            Member::example(tenant, "Carla"),
        ];
        members[2].eligible = false;
        (roles, members)
    }

    #[test]
    fn selection_beyond_cap_is_refused() {
        let (roles, members) = setup();
        let mut selections = Selections::new(&roles, &members);
        selections.select(roles[1].id, members[0].id).unwrap();
        assert!(matches!(
            selections.select(roles[1].id, members[1].id),
            Err(Error::Validation(_))
        ));

        let (ballots, votes) = selections.into_records(roles[1].commission_id, "sig", None);
        assert_eq!(ballots.len(), 1);
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].member_id, members[0].id);
    }

    #[test]
    fn invalid_choices_are_refused() {
        let (roles, members) = setup();
        let mut selections = Selections::new(&roles, &members);

        selections.select(roles[0].id, members[0].id).unwrap();
        assert!(matches!(
            selections.select(roles[0].id, members[0].id),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            selections.select(roles[2].id, members[0].id),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            selections.select(Id::new(), members[0].id),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            selections.select(roles[0].id, members[2].id),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            selections.select(roles[0].id, Id::new()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn one_ballot_per_role_sharing_a_signature() {
        let (roles, members) = setup();
        let mut selections = Selections::new(&roles, &members);
        assert!(selections.is_empty());
        selections.select(roles[1].id, members[1].id).unwrap();
        selections.select(roles[0].id, members[0].id).unwrap();
        selections.select(roles[0].id, members[1].id).unwrap();
        let voter = Some(members[0].id);

        let (ballots, votes) = selections.into_records(roles[0].commission_id, "sig-1", voter);
        assert_eq!(ballots.len(), 2);
        assert_eq!(ballots[0].role_id, roles[0].id);
        assert_eq!(ballots[1].role_id, roles[1].id);
        assert!(ballots.iter().all(|b| b.signature == "sig-1" && b.voter_id == voter));
        assert_eq!(votes.len(), 3);
        assert_eq!(votes.iter().filter(|v| v.ballot_id == ballots[0].id).count(), 2);
    }

    #[backend_test]
    async fn simultaneous_repeat_ballots_record_one(store: Store) {
        use crate::engine::{commissions, members, roles};
        use crate::model::api::{commission::CommissionSpec, member::MemberSpec, role::RoleSpec};
        use crate::model::db::Tenant;

        let tenant = store.insert(&Tenant::example1()).await.unwrap();
        let voter = members::create(&store, tenant.id, MemberSpec::example("Maria Silva"))
            .await
            .unwrap();
        let spec = CommissionSpec {
            anonymity: AnonymityMode::RequiredIdentification,
            ..CommissionSpec::example1()
        };
        let commission = commissions::create(&store, tenant.id, spec).await.unwrap();
        let elders = roles::add(&store, commission.id, RoleSpec::example("Elders", 1))
            .await
            .unwrap();
        let commission = commissions::open(&store, commission.id).await.unwrap();

        let ballot = || Submission {
            voter_id: Some(voter.id.into()),
            ..Submission::example(elders.id.into(), &[voter.id.into()])
        };
        let (first, second) = rocket::tokio::join!(
            submit(&store, &commission, ballot()),
            submit(&store, &commission, ballot()),
        );
        let refused = [first, second].into_iter().filter(|r| r.is_err()).collect::<Vec<_>>();
        assert_eq!(refused.len(), 1);
        assert!(matches!(refused[0], Err(Error::PreconditionFailed(_))));

        let ballots: Vec<Ballot> = store.find(&Filter::new()).await.unwrap();
        assert_eq!(ballots.len(), 1);
        let votes: Vec<Vote> = store.find(&Filter::new()).await.unwrap();
        assert_eq!(votes.len(), 1);
    }

    #[test]
    fn signatures_are_distinct() {
        let a = signature();
        assert!(a.starts_with("ballot-"));
        assert_ne!(a, signature());
    }
}
