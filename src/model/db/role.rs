use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::storage::Id;

/// A position voted on within a commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: Id,
    pub commission_id: Id,
    pub name: String,
    /// How many members a single ballot may select. At least one.
    pub max_selections: u32,
    /// 1-based display and voting position among active roles.
    pub order: u32,
    /// Inactive roles are soft-deleted.
    pub active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(commission_id: Id, name: String, max_selections: u32, order: u32) -> Self {
        Self {
            id: Id::new(),
            commission_id,
            name,
            max_selections,
            order,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Name and selection limit of each role in the standard set.
pub const DEFAULT_ROLES: [(&str, u32); 27] = [
    ("Elders", 4),
    ("Secretary", 2),
    ("Treasury", 2),
    ("Deacons", 2),
    ("Deaconesses", 2),
    ("Sabbath School", 2),
    ("Personal Ministries", 2),
    ("Stewardship", 2),
    ("Publishing Ministries and Spirit of Prophecy", 2),
    ("Family Ministries", 2),
    ("Women's Ministries", 2),
    ("Music Ministries", 2),
    ("Health Ministries", 2),
    ("Children's Ministries", 2),
    ("Adolescent Ministries", 2),
    ("Reception Ministry", 2),
    ("Youth Ministries", 2),
    ("Adventist Community Services", 2),
    ("Adventurer Club", 2),
    ("Pathfinder Club", 2),
    ("Communication", 2),
    ("Interested Persons", 2),
    ("Property", 2),
    ("Sound", 2),
    ("Public Affairs and Religious Liberty", 2),
    ("Self-nomination", 1),
    ("Participant name", 1),
];

/// The standard role set for a commission, ordered after `after` existing roles.
pub fn default_roles(commission_id: Id, after: u32) -> Vec<Role> {
    DEFAULT_ROLES
        .iter()
        .zip(after + 1..)
        .map(|(&(name, max_selections), order)| {
            Role::new(commission_id, name.to_string(), max_selections, order)
        })
        .collect()
}
