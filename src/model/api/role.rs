use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Formatter, Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};

use crate::model::{api::id::ApiId, db::Role};

/// A role to append to a commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub name: String,
    pub max_selections: u32,
}

/// Changes to a role. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub max_selections: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescription {
    pub id: ApiId,
    pub name: String,
    pub max_selections: u32,
    pub order: u32,
    pub active: bool,
}

impl From<Role> for RoleDescription {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.into(),
            name: role.name,
            max_selections: role.max_selections,
            order: role.order,
            active: role.active,
        }
    }
}

/// Which neighbour a role swaps places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl<'a> FromParam<'a> for MoveDirection {
    type Error = &'a str;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        match param {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(other),
        }
    }
}

impl UriDisplay<Path> for MoveDirection {
    fn fmt(&self, f: &mut Formatter<'_, Path>) -> std::fmt::Result {
        f.write_raw(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

impl_from_uri_param_identity!([Path] MoveDirection);
