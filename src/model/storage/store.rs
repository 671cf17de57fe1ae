use std::sync::Arc;

use mongodb::bson::{self, Document};
use rocket::{
    request::{self, FromRequest, Request},
    State,
};
use serde::{de::DeserializeOwned, Serialize};

use super::{Batch, Commit, Filter, Id, MemoryBackend, StorageBackend};
use crate::error::{Error, Result};

/// A type stored as records of one entity set.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// The name of the entity set.
    const NAME: &'static str;
    /// Human-readable name for error messages.
    const LABEL: &'static str;
}

/// An entity whose records may be written without a precondition.
///
/// Entities owned by a commission deliberately do not implement this; they
/// are only written through [`crate::model::db::CommissionWrite`].
pub trait Unguarded: Entity {}

pub(crate) fn to_documents<T: Serialize>(records: &[T]) -> Result<Vec<Document>> {
    records
        .iter()
        .map(|record| Ok(bson::to_document(record)?))
        .collect()
}

fn from_documents<T: Entity>(records: Vec<Document>) -> Result<Vec<T>> {
    records
        .into_iter()
        .map(|record| Ok(bson::from_document(record)?))
        .collect()
}

/// A batch of writes to unguarded entities, optionally conditional on
/// other records.
#[derive(Debug, Default)]
pub struct WriteBatch {
    batch: Batch,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only apply the batch if some record of `T` matches `filter`.
    pub fn require<T: Entity>(mut self, filter: Filter) -> Self {
        self.batch.guard(T::NAME, filter);
        self
    }

    pub fn insert<T: Unguarded>(mut self, records: &[T]) -> Result<Self> {
        self.batch.insert(T::NAME, to_documents(records)?);
        Ok(self)
    }

    pub fn update<T: Unguarded>(mut self, filter: Filter, patch: Document) -> Self {
        self.batch.update(T::NAME, filter, patch);
        self
    }

    pub fn delete<T: Unguarded>(mut self, filter: Filter) -> Self {
        self.batch.delete(T::NAME, filter);
        self
    }
}

/// Typed handle on the configured storage backend.
#[derive(Clone)]
pub struct Store(Arc<dyn StorageBackend>);

impl Store {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self(Arc::new(backend))
    }

    /// A fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn backend_name(&self) -> &'static str {
        self.0.name()
    }

    pub async fn find<T: Entity>(&self, filter: &Filter) -> Result<Vec<T>> {
        from_documents(self.0.query(T::NAME, filter).await?)
    }

    pub async fn find_one<T: Entity>(&self, filter: &Filter) -> Result<Option<T>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    /// Fetch a record by ID, failing with [`Error::NotFound`].
    pub async fn get<T: Entity>(&self, id: Id) -> Result<T> {
        self.find_one(&Filter::by_id(id))
            .await?
            .ok_or_else(|| Error::not_found(format!("{} {id}", T::LABEL)))
    }

    pub async fn insert<T: Unguarded>(&self, record: &T) -> Result<T> {
        let mut stored = self.insert_many(std::slice::from_ref(record)).await?;
        stored
            .pop()
            .ok_or_else(|| Error::Storage(format!("insert into {} returned nothing", T::NAME)))
    }

    pub async fn insert_many<T: Unguarded>(&self, records: &[T]) -> Result<Vec<T>> {
        from_documents(self.0.insert(T::NAME, to_documents(records)?).await?)
    }

    pub async fn update<T: Unguarded>(&self, filter: &Filter, patch: Document) -> Result<Vec<T>> {
        from_documents(self.0.update(T::NAME, filter, patch).await?)
    }

    pub async fn delete<T: Unguarded>(&self, filter: &Filter) -> Result<u64> {
        self.0.delete(T::NAME, filter).await
    }

    pub async fn commit(&self, batch: WriteBatch) -> Result<Commit> {
        self.commit_raw(batch.batch).await
    }

    /// Apply an arbitrary batch; callers are responsible for its guards.
    pub(crate) async fn commit_raw(&self, batch: Batch) -> Result<Commit> {
        let commit = self.0.commit(batch).await?;
        if let Commit::Rejected { guard } = commit {
            debug!("Batch rejected by guard {guard}");
        }
        Ok(commit)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Store {
    type Error = ();

    /// Clone the store out of managed state.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        req.guard::<&State<Store>>()
            .await
            .map(|store| store.inner().clone())
    }
}
