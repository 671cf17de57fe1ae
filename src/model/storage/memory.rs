use std::collections::HashMap;

use mongodb::bson::Document;
use rocket::tokio::sync::RwLock;

use super::{backend::stamp, Batch, Commit, Filter, Op, StorageBackend};
use crate::error::Result;

type Sets = HashMap<&'static str, Vec<Document>>;

/// Process-local storage. Every batch is applied under one write lock.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sets: RwLock<Sets>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_update(sets: &mut Sets, entity: &'static str, filter: &Filter, patch: &Document) -> Vec<Document> {
    let Some(records) = sets.get_mut(entity) else {
        return Vec::new();
    };
    let mut updated = Vec::new();
    for record in records.iter_mut().filter(|r| filter.matches(r)) {
        for (key, value) in patch {
            record.insert(key.clone(), value.clone());
        }
        updated.push(record.clone());
    }
    updated
}

fn apply_delete(sets: &mut Sets, entity: &'static str, filter: &Filter) -> u64 {
    let Some(records) = sets.get_mut(entity) else {
        return 0;
    };
    let before = records.len();
    records.retain(|r| !filter.matches(r));
    (before - records.len()) as u64
}

#[rocket::async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, entity: &'static str, filter: &Filter) -> Result<Vec<Document>> {
        let sets = self.sets.read().await;
        Ok(sets
            .get(entity)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, entity: &'static str, records: Vec<Document>) -> Result<Vec<Document>> {
        let stamped: Vec<_> = records.into_iter().map(stamp).collect();
        let mut sets = self.sets.write().await;
        sets.entry(entity).or_default().extend(stamped.iter().cloned());
        Ok(stamped)
    }

    async fn update(
        &self,
        entity: &'static str,
        filter: &Filter,
        patch: Document,
    ) -> Result<Vec<Document>> {
        let mut sets = self.sets.write().await;
        Ok(apply_update(&mut sets, entity, filter, &patch))
    }

    async fn delete(&self, entity: &'static str, filter: &Filter) -> Result<u64> {
        let mut sets = self.sets.write().await;
        Ok(apply_delete(&mut sets, entity, filter))
    }

    async fn commit(&self, batch: Batch) -> Result<Commit> {
        let mut sets = self.sets.write().await;
        for (index, guard) in batch.guards().iter().enumerate() {
            let found = sets
                .get(guard.entity)
                .map_or(false, |records| records.iter().any(|r| guard.filter.matches(r)));
            if !guard.holds(found) {
                return Ok(Commit::Rejected { guard: index });
            }
        }
        for op in batch.into_ops() {
            match op {
                Op::Insert { entity, records } => {
                    sets.entry(entity)
                        .or_default()
                        .extend(records.into_iter().map(stamp));
                }
                Op::Update {
                    entity,
                    filter,
                    patch,
                } => {
                    apply_update(&mut sets, entity, &filter, &patch);
                }
                Op::Delete { entity, filter } => {
                    apply_delete(&mut sets, entity, &filter);
                }
            }
        }
        Ok(Commit::Applied)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, Bson};

    use super::*;

    #[rocket::async_test]
    async fn insert_generates_fields() {
        let backend = MemoryBackend::new();
        let inserted = backend
            .insert("things", vec![doc! { "name": "a" }])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(inserted[0].get_object_id("_id").is_ok());
        assert!(inserted[0].get_datetime("created_at").is_ok());

        let found = backend.query("things", &Filter::new()).await.unwrap();
        assert_eq!(found, inserted);
    }

    #[rocket::async_test]
    async fn update_and_delete() {
        let backend = MemoryBackend::new();
        backend
            .insert(
                "things",
                vec![doc! { "n": 1, "tag": "x" }, doc! { "n": 2, "tag": "y" }],
            )
            .await
            .unwrap();

        let updated = backend
            .update("things", &Filter::new().eq("tag", "x"), doc! { "tag": "z" })
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].get("tag"), Some(&Bson::from("z")));

        let removed = backend
            .delete("things", &Filter::new().one_of("tag", ["z", "y"]))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(backend.query("things", &Filter::new()).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn failed_guard_writes_nothing() {
        let backend = MemoryBackend::new();
        backend
            .insert("owners", vec![doc! { "_id": 1, "status": "closed" }])
            .await
            .unwrap();

        let mut batch = Batch::new();
        batch
            .guard("owners", Filter::by_id(1).eq("status", "open"))
            .insert("children", vec![doc! { "owner": 1 }])
            .update("owners", Filter::by_id(1), doc! { "touched": true });
        assert_eq!(
            backend.commit(batch).await.unwrap(),
            Commit::Rejected { guard: 0 }
        );
        assert!(backend.query("children", &Filter::new()).await.unwrap().is_empty());
        let owner = backend.query("owners", &Filter::new()).await.unwrap();
        assert!(!owner[0].contains_key("touched"));

        let mut batch = Batch::new();
        batch
            .guard("owners", Filter::by_id(1).eq("status", "closed"))
            .insert("children", vec![doc! { "owner": 1 }]);
        assert!(backend.commit(batch).await.unwrap().is_applied());
        assert_eq!(backend.query("children", &Filter::new()).await.unwrap().len(), 1);
    }

    #[rocket::async_test]
    async fn absent_guard_refuses_duplicates() {
        let backend = MemoryBackend::new();
        backend
            .insert("owners", vec![doc! { "_id": 1, "status": "open" }])
            .await
            .unwrap();

        let claim = || {
            let mut batch = Batch::new();
            batch
                .guard("owners", Filter::by_id(1).eq("status", "open"))
                .guard_absent("claims", Filter::new().eq("owner", 1).eq("who", "ana"))
                .insert("claims", vec![doc! { "owner": 1, "who": "ana" }]);
            batch
        };
        assert!(backend.commit(claim()).await.unwrap().is_applied());
        assert_eq!(
            backend.commit(claim()).await.unwrap(),
            Commit::Rejected { guard: 1 }
        );
        assert_eq!(backend.query("claims", &Filter::new()).await.unwrap().len(), 1);
    }
}
