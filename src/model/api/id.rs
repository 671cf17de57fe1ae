use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::storage::Id;

/// An API-friendly ID that serializes to a hex string rather than a nested
/// struct, so it can be used both as a JSON value and as a JSON map key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiId(Id);

impl Debug for ApiId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Display for ApiId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiId {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<Id>()?))
    }
}

impl TryFrom<String> for ApiId {
    type Error = mongodb::bson::oid::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ApiId> for String {
    fn from(id: ApiId) -> Self {
        id.to_string()
    }
}

impl From<Id> for ApiId {
    fn from(id: Id) -> Self {
        Self(id)
    }
}

impl From<ApiId> for Id {
    fn from(id: ApiId) -> Self {
        id.0
    }
}

impl Deref for ApiId {
    type Target = Id;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rocket::serde::json::{from_str, to_string};

    use super::*;

    #[test]
    fn json_string_and_map_key() {
        let id = ApiId::from(Id::new());
        let text = to_string(&id).unwrap();
        assert_eq!(text, format!("\"{id}\""));
        assert_eq!(from_str::<ApiId>(&text).unwrap(), id);

        let map: HashMap<ApiId, u32> = from_str(&format!("{{\"{id}\": 2}}")).unwrap();
        assert_eq!(map[&id], 2);

        assert!(from_str::<ApiId>("\"nope\"").is_err());
    }
}
