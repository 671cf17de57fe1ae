//! The ordered, soft-deletable roles of a commission.

use mongodb::bson::{doc, Document};

use crate::error::{Error, Result};
use crate::model::{
    api::role::{MoveDirection, RoleSpec, RoleUpdate},
    common::CommissionStatus,
    db::{default_roles, CommissionWrite, Role},
    storage::{Filter, Id, Store},
};

use super::required;

fn check_max_selections(max_selections: u32) -> Result<u32> {
    if max_selections == 0 {
        Err(Error::invalid("A role must allow at least one selection"))
    } else {
        Ok(max_selections)
    }
}

fn editing(commission_id: Id) -> CommissionWrite {
    CommissionWrite::new(commission_id, &CommissionStatus::EDITABLE)
}

fn order_patch(order: u32) -> Document {
    doc! {"order": order}
}

/// Roles of a commission in display order. Inactive roles are only
/// included on request.
pub async fn list(store: &Store, commission_id: Id, include_inactive: bool) -> Result<Vec<Role>> {
    let mut filter = Filter::new().eq("commission_id", commission_id);
    if !include_inactive {
        filter = filter.eq("active", true);
    }
    let mut roles: Vec<Role> = store.find(&filter).await?;
    roles.sort_by(|a, b| {
        (!a.active, a.order, a.id).cmp(&(!b.active, b.order, b.id))
    });
    Ok(roles)
}

/// Fetch a role, which must belong to the given commission.
pub async fn get(store: &Store, commission_id: Id, role_id: Id) -> Result<Role> {
    store
        .find_one::<Role>(&Filter::by_id(role_id).eq("commission_id", commission_id))
        .await?
        .ok_or_else(|| Error::not_found(format!("Role {role_id} in commission {commission_id}")))
}

fn next_order(active: &[Role]) -> u32 {
    active.iter().map(|r| r.order).max().unwrap_or(0)
}

/// Append a role after the last active one.
pub async fn add(store: &Store, commission_id: Id, spec: RoleSpec) -> Result<Role> {
    let name = required(&spec.name, "Role name")?;
    let max_selections = check_max_selections(spec.max_selections)?;
    let active = list(store, commission_id, false).await?;
    let role = Role::new(commission_id, name, max_selections, next_order(&active) + 1);

    editing(commission_id).insert(&[role.clone()])?.commit(store).await?;
    debug!("Added role {} to commission {commission_id}", role.id);
    Ok(role)
}

/// Append the standard role set after the last active role.
pub async fn apply_defaults(store: &Store, commission_id: Id) -> Result<Vec<Role>> {
    let active = list(store, commission_id, false).await?;
    let roles = default_roles(commission_id, next_order(&active));
    editing(commission_id).insert(&roles)?.commit(store).await?;
    info!("Applied {} default roles to commission {commission_id}", roles.len());
    list(store, commission_id, false).await
}

pub async fn update(store: &Store, commission_id: Id, role_id: Id, update: RoleUpdate) -> Result<Role> {
    get(store, commission_id, role_id).await?;

    let mut patch = Document::new();
    if let Some(name) = update.name {
        patch.insert("name", required(&name, "Role name")?);
    }
    if let Some(max_selections) = update.max_selections {
        patch.insert("max_selections", check_max_selections(max_selections)?);
    }
    if !patch.is_empty() {
        editing(commission_id)
            .update::<Role>(Filter::by_id(role_id), patch)
            .commit(store)
            .await?;
    }
    get(store, commission_id, role_id).await
}

/// Renumber `roles` to `1..=n` in their current order, skipping roles that
/// already have the right position.
fn renumber(write: CommissionWrite, roles: &[Role]) -> CommissionWrite {
    roles
        .iter()
        .zip(1..)
        .filter(|(role, order)| role.order != *order)
        .fold(write, |write, (role, order)| {
            write.update::<Role>(Filter::by_id(role.id), order_patch(order))
        })
}

/// Soft-delete a role, closing the gap it leaves in the ordering.
pub async fn deactivate(store: &Store, commission_id: Id, role_id: Id) -> Result<Vec<Role>> {
    get(store, commission_id, role_id).await?;
    let remaining: Vec<Role> = list(store, commission_id, false)
        .await?
        .into_iter()
        .filter(|r| r.id != role_id)
        .collect();

    let write = editing(commission_id).update::<Role>(Filter::by_id(role_id), doc! {"active": false});
    renumber(write, &remaining).commit(store).await?;
    debug!("Deactivated role {role_id} of commission {commission_id}");
    list(store, commission_id, false).await
}

/// Swap a role with its neighbour. Moving past either end does nothing.
pub async fn move_role(
    store: &Store,
    commission_id: Id,
    role_id: Id,
    direction: MoveDirection,
) -> Result<Vec<Role>> {
    let roles = list(store, commission_id, false).await?;
    let index = roles
        .iter()
        .position(|r| r.id == role_id)
        .ok_or_else(|| Error::not_found(format!("Active role {role_id} in commission {commission_id}")))?;
    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&i| i < roles.len()),
    };
    let Some(neighbour) = neighbour else {
        return Ok(roles);
    };

    let (role, other) = (&roles[index], &roles[neighbour]);
    editing(commission_id)
        .update::<Role>(Filter::by_id(role.id), order_patch(other.order))
        .update::<Role>(Filter::by_id(other.id), order_patch(role.order))
        .commit(store)
        .await?;
    list(store, commission_id, false).await
}
