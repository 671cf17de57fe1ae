use mongodb::bson::{oid::ObjectId, DateTime, Document};

use super::{Batch, Commit, Filter};
use crate::error::Result;

/// Field every stored record carries as its unique ID.
pub const ID_FIELD: &str = "_id";
/// Field every stored record carries as its creation timestamp.
pub const CREATED_AT_FIELD: &str = "created_at";

/// Record-level persistence over named entity sets.
///
/// Records are BSON documents; typed access goes through [`super::Store`].
#[rocket::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    async fn query(&self, entity: &'static str, filter: &Filter) -> Result<Vec<Document>>;

    /// Insert records, generating `_id` and `created_at` where absent.
    /// Returns the records as stored.
    async fn insert(&self, entity: &'static str, records: Vec<Document>) -> Result<Vec<Document>>;

    /// Set the fields of `patch` on every matching record and return them.
    async fn update(
        &self,
        entity: &'static str,
        filter: &Filter,
        patch: Document,
    ) -> Result<Vec<Document>>;

    /// Remove every matching record, returning how many were removed.
    async fn delete(&self, entity: &'static str, filter: &Filter) -> Result<u64>;

    /// Apply a guarded batch atomically.
    async fn commit(&self, batch: Batch) -> Result<Commit>;
}

/// Fill in the generated fields of a record about to be inserted.
pub(crate) fn stamp(mut record: Document) -> Document {
    if !record.contains_key(ID_FIELD) {
        record.insert(ID_FIELD, ObjectId::new());
    }
    if !record.contains_key(CREATED_AT_FIELD) {
        record.insert(CREATED_AT_FIELD, DateTime::now());
    }
    record
}
