//! One-way finalization of a commission.
//!
//! Finalizing takes two steps: a random 6-digit key is issued and shown to
//! the operator, who must then enter the same key and acknowledge that the
//! action cannot be undone. The key confirms a deliberate action; it is not
//! a secret.

use mongodb::bson::{doc, Bson, DateTime};
use rand::Rng;

use crate::error::{Error, Result};
use crate::model::{
    api::commission::{FinalizationChallenge, FinalizationConfirm},
    common::CommissionStatus,
    db::{rejection, Commission, CommissionWrite},
    storage::{Commit, Filter, Id, Store},
};

const KEY_DIGITS: usize = 6;
const CHALLENGE_FIELD: &str = "finalization_challenge";

pub fn generate_key(rng: &mut impl Rng) -> String {
    rng.gen_range(100_000..=999_999_u32).to_string()
}

fn well_formed(key: &str) -> bool {
    key.len() == KEY_DIGITS && key.bytes().all(|b| b.is_ascii_digit())
}

/// Checks that need no stored state.
fn check_request(key: &str, acknowledged: bool) -> Result<()> {
    if !acknowledged {
        return Err(Error::invalid(
            "Finalization must be acknowledged as irreversible",
        ));
    }
    if !well_formed(key) {
        return Err(Error::invalid(format!(
            "Finalization key must be {KEY_DIGITS} digits"
        )));
    }
    Ok(())
}

/// Decide whether `entered` may finalize a commission whose pending key is
/// `challenge`.
pub fn check_confirmation(challenge: Option<&str>, entered: &str, acknowledged: bool) -> Result<()> {
    check_request(entered, acknowledged)?;
    match challenge {
        None => Err(Error::precondition("No finalization key has been issued")),
        Some(expected) if expected != entered => {
            Err(Error::invalid("Finalization key does not match"))
        }
        Some(_) => Ok(()),
    }
}

/// Issue a fresh key for an open commission, replacing any earlier one.
pub async fn issue_key(store: &Store, commission_id: Id) -> Result<FinalizationChallenge> {
    let key = generate_key(&mut rand::thread_rng());
    CommissionWrite::new(commission_id, &[CommissionStatus::Open])
        .update::<Commission>(Filter::by_id(commission_id), doc! {CHALLENGE_FIELD: key.as_str()})
        .commit(store)
        .await?;
    info!("Issued finalization key for commission {commission_id}");
    Ok(FinalizationChallenge {
        commission_id: commission_id.into(),
        key,
    })
}

/// Explain a refused finalization from the commission's current state.
fn classify(commission: &Commission, confirm: &FinalizationConfirm) -> Error {
    match commission.status {
        CommissionStatus::Finalized => Error::CommitteeFinalized(commission.id),
        CommissionStatus::Draft => Error::precondition(format!(
            "Commission {} must be open to be finalized",
            commission.id
        )),
        CommissionStatus::Open => {
            match check_confirmation(
                commission.finalization_challenge.as_deref(),
                &confirm.key,
                confirm.acknowledged,
            ) {
                Err(err) => err,
                // The key matched on reread, so it changed concurrently.
                Ok(()) => Error::precondition("Finalization key was reissued, try again"),
            }
        }
    }
}

/// Finalize a commission if the operator entered its pending key.
///
/// The status change is conditional on the commission still being open
/// with the same pending key, so it cannot race with a submission or a
/// second finalization.
pub async fn confirm(store: &Store, commission_id: Id, confirm: &FinalizationConfirm) -> Result<Commission> {
    check_request(&confirm.key, confirm.acknowledged)?;

    let commission: Commission = store.get(commission_id).await?;
    if commission.status != CommissionStatus::Open {
        return Err(classify(&commission, confirm));
    }
    check_confirmation(
        commission.finalization_challenge.as_deref(),
        &confirm.key,
        confirm.acknowledged,
    )?;

    let patch = doc! {
        "status": CommissionStatus::Finalized,
        "finalization_key": confirm.key.as_str(),
        "finalized_at": DateTime::now(),
        CHALLENGE_FIELD: Bson::Null,
    };
    let commit = CommissionWrite::new(commission_id, &[CommissionStatus::Open])
        .with_condition(CHALLENGE_FIELD, confirm.key.as_str())
        .update::<Commission>(Filter::by_id(commission_id), patch)
        .try_commit(store)
        .await?;

    if let Commit::Rejected { .. } = commit {
        return Err(match store.find_one::<Commission>(&Filter::by_id(commission_id)).await? {
            Some(current) => classify(&current, confirm),
            None => rejection(store, commission_id, &[CommissionStatus::Open]).await,
        });
    }

    info!("Commission {commission_id} finalized");
    store.get(commission_id).await
}
