use chrono::{DateTime, Utc};
use mongodb::bson::{
    serde_helpers::chrono_datetime_as_bson_datetime, Bson, DateTime as BsonDateTime, Document,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::{AnonymityMode, CommissionStatus},
    storage::{to_documents, Batch, Commit, Entity, Filter, Id, Store},
};

/// A nomination commission: a set of roles voted on by its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    #[serde(rename = "_id")]
    pub id: Id,
    pub tenant_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub year: i32,
    pub status: CommissionStatus,
    pub anonymity: AnonymityMode,
    /// Public identifier used in voting links.
    pub link_code: String,
    /// Survey whose suggestions order the candidates.
    pub survey_id: Option<Id>,
    /// The key confirmed at finalization.
    pub finalization_key: Option<String>,
    pub finalized_at: Option<BsonDateTime>,
    /// The key most recently shown to the operator, awaiting confirmation.
    pub finalization_challenge: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Commission {
    pub fn new(tenant_id: Id, name: String, year: i32, link_code: String) -> Self {
        Self {
            id: Id::new(),
            tenant_id,
            name,
            description: None,
            year,
            status: CommissionStatus::Draft,
            anonymity: AnonymityMode::default(),
            link_code,
            survey_id: None,
            finalization_key: None,
            finalized_at: None,
            finalization_challenge: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_editable(&self) -> bool {
        CommissionStatus::EDITABLE.contains(&self.status)
    }
}

/// Records owned by a single commission. These can only be written through
/// [`CommissionWrite`], so every write is checked against the commission's
/// status in the same atomic step.
pub trait CommissionScoped: Entity {
    /// Field holding the owning commission's ID.
    const SCOPE_FIELD: &'static str;

    fn commission_id(&self) -> Id;
}

/// A batch of writes to one commission's records, applied only while the
/// commission is in an allowed status.
#[derive(Debug)]
pub struct CommissionWrite {
    commission_id: Id,
    allowed: Vec<CommissionStatus>,
    guard: Option<Filter>,
    /// Messages for the absence guards, in order.
    conflicts: Vec<String>,
    batch: Batch,
}

impl CommissionWrite {
    pub fn new(commission_id: Id, allowed: &[CommissionStatus]) -> Self {
        let guard = Filter::by_id(commission_id).one_of("status", allowed.iter().copied());
        Self {
            commission_id,
            allowed: allowed.to_vec(),
            guard: Some(guard),
            conflicts: Vec::new(),
            batch: Batch::new(),
        }
    }

    /// Insert a new commission, along with any of its initial records.
    pub fn create(commission: &Commission) -> Result<Self> {
        let mut batch = Batch::new();
        batch.insert(Commission::NAME, to_documents(std::slice::from_ref(commission))?);
        Ok(Self {
            commission_id: commission.id,
            allowed: Vec::new(),
            guard: None,
            conflicts: Vec::new(),
            batch,
        })
    }

    /// Additionally require the commission's `field` to equal `value`.
    pub fn with_condition(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.guard = self.guard.map(|guard| guard.eq(field, value));
        self
    }

    /// Refuse the writes if any of this commission's records of `T` match
    /// `filter`, failing with `conflict` as the reason.
    pub fn require_absent<T: CommissionScoped>(mut self, filter: Filter, conflict: impl Into<String>) -> Self {
        let filter = filter.eq(T::SCOPE_FIELD, self.commission_id);
        self.batch.guard_absent(T::NAME, filter);
        self.conflicts.push(conflict.into());
        self
    }

    pub fn insert<T: CommissionScoped>(mut self, records: &[T]) -> Result<Self> {
        if let Some(stray) = records.iter().find(|r| r.commission_id() != self.commission_id) {
            return Err(Error::Storage(format!(
                "{} belongs to commission {}, not {}",
                T::LABEL,
                stray.commission_id(),
                self.commission_id
            )));
        }
        self.batch.insert(T::NAME, to_documents(records)?);
        Ok(self)
    }

    /// Patch the matching records of this commission.
    pub fn update<T: CommissionScoped>(mut self, filter: Filter, patch: Document) -> Self {
        let filter = filter.eq(T::SCOPE_FIELD, self.commission_id);
        self.batch.update(T::NAME, filter, patch);
        self
    }

    fn into_batch(self) -> Batch {
        let mut batch = Batch::new();
        if let Some(guard) = self.guard {
            batch.guard(Commission::NAME, guard);
        }
        batch.append(self.batch);
        batch
    }

    /// Apply the writes, reporting whether the guard held.
    pub async fn try_commit(self, store: &Store) -> Result<Commit> {
        store.commit_raw(self.into_batch()).await
    }

    /// Apply the writes, turning a failed guard into the matching error.
    pub async fn commit(self, store: &Store) -> Result<()> {
        let commission_id = self.commission_id;
        let allowed = self.allowed.clone();
        let status_guards = usize::from(self.guard.is_some());
        let conflicts = self.conflicts.clone();
        match self.try_commit(store).await? {
            Commit::Applied => Ok(()),
            Commit::Rejected { guard } if guard >= status_guards => {
                match conflicts.get(guard - status_guards) {
                    Some(conflict) => Err(Error::precondition(conflict.clone())),
                    None => Err(Error::Storage(format!("Unexpected guard {guard} rejected the write"))),
                }
            }
            Commit::Rejected { .. } => Err(rejection(store, commission_id, &allowed).await),
        }
    }
}

/// Explain why a write guarded on the commission's status was refused.
pub async fn rejection(store: &Store, commission_id: Id, allowed: &[CommissionStatus]) -> Error {
    let commission = match store.find_one::<Commission>(&Filter::by_id(commission_id)).await {
        Ok(found) => found,
        Err(err) => return err,
    };
    match commission {
        None => Error::not_found(format!("Commission {commission_id}")),
        Some(c) if c.status == CommissionStatus::Finalized => Error::CommitteeFinalized(c.id),
        Some(c) => Error::precondition(format!(
            "Commission {} is {:?}, expected one of {:?}",
            c.id, c.status, allowed
        )),
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl Commission {
        pub fn example1(tenant_id: Id) -> Self {
            Self {
                description: Some("Nominations for the coming year".to_string()),
                ..Self::new(
                    tenant_id,
                    "Nominating Committee".to_string(),
                    2025,
                    "AB12CD34".to_string(),
                )
            }
        }
    }
}
