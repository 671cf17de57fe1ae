use mongodb::{
    bson::{doc, Bson, Document},
    error::UNKNOWN_TRANSACTION_COMMIT_RESULT,
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};
use rocket::futures::TryStreamExt;

use super::{backend::stamp, Batch, Commit, Filter, Op, StorageBackend, ID_FIELD};
use crate::error::{Error, Result};
use crate::model::db::{Ballot, Commission, Member, Role, Survey, SurveyItem, SurveyVote, Vote};
use crate::model::storage::Entity;

/// Field bumped on guarded records so that concurrent transactions touching
/// the same record conflict.
const REVISION_FIELD: &str = "_rev";

/// Storage in a MongoDB database. Batches run as multi-document
/// transactions, which requires a replica set.
#[derive(Debug, Clone)]
pub struct MongoBackend {
    client: Client,
    db: Database,
}

impl MongoBackend {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        Ok(Self { client, db })
    }

    fn coll(&self, entity: &str) -> Collection<Document> {
        self.db.collection(entity)
    }

    /// Ensure that all the required indexes exist.
    ///
    /// This operation is idempotent.
    pub async fn ensure_indexes(&self) -> Result<()> {
        debug!("Ensuring collection indexes exist");

        let unique = IndexOptions::builder().unique(true).build();
        let indexes = [
            (Commission::NAME, doc! {"link_code": 1}, true),
            (Survey::NAME, doc! {"link_code": 1}, true),
            (Member::NAME, doc! {"tenant_id": 1, "full_name": 1}, false),
            (Role::NAME, doc! {"commission_id": 1, "order": 1}, false),
            (Ballot::NAME, doc! {"commission_id": 1, "role_id": 1, "voter_id": 1}, false),
            (Vote::NAME, doc! {"commission_id": 1, "ballot_id": 1}, false),
            (SurveyItem::NAME, doc! {"survey_id": 1, "order": 1}, false),
            (SurveyVote::NAME, doc! {"survey_id": 1, "role_name": 1}, false),
        ];
        for (entity, keys, is_unique) in indexes {
            let index = IndexModel::builder()
                .keys(keys)
                .options(is_unique.then(|| unique.clone()))
                .build();
            self.coll(entity).create_index(index, None).await?;
        }
        Ok(())
    }

    async fn find(&self, entity: &str, filter: &Filter) -> Result<Vec<Document>> {
        Ok(self
            .coll(entity)
            .find(filter.to_document(), None)
            .await?
            .try_collect()
            .await?)
    }
}

#[rocket::async_trait]
impl StorageBackend for MongoBackend {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn query(&self, entity: &'static str, filter: &Filter) -> Result<Vec<Document>> {
        self.find(entity, filter).await
    }

    async fn insert(&self, entity: &'static str, records: Vec<Document>) -> Result<Vec<Document>> {
        if records.is_empty() {
            return Ok(records);
        }
        let stamped: Vec<_> = records.into_iter().map(stamp).collect();
        self.coll(entity).insert_many(&stamped, None).await?;
        Ok(stamped)
    }

    async fn update(
        &self,
        entity: &'static str,
        filter: &Filter,
        patch: Document,
    ) -> Result<Vec<Document>> {
        // The patch may change fields the filter selects on, so remember
        // which records it applies to first.
        let ids: Vec<Bson> = self
            .find(entity, filter)
            .await?
            .into_iter()
            .filter_map(|record| record.get(ID_FIELD).cloned())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let targets = filter.clone().one_of(ID_FIELD, ids.clone());
        self.coll(entity)
            .update_many(targets.to_document(), doc! {"$set": patch}, None)
            .await?;
        self.find(entity, &Filter::new().one_of(ID_FIELD, ids)).await
    }

    async fn delete(&self, entity: &'static str, filter: &Filter) -> Result<u64> {
        let result = self
            .coll(entity)
            .delete_many(filter.to_document(), None)
            .await?;
        Ok(result.deleted_count)
    }

    async fn commit(&self, batch: Batch) -> Result<Commit> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        // Each presence guard is a conditional write, so it both checks the
        // record and claims it for the rest of the transaction. Absence
        // guards read inside the same transaction, after those claims.
        for (index, guard) in batch.guards().iter().enumerate() {
            if guard.absent {
                let found = self
                    .coll(guard.entity)
                    .count_documents_with_session(guard.filter.to_document(), None, &mut session)
                    .await?;
                if !guard.holds(found > 0) {
                    session.abort_transaction().await?;
                    return Ok(Commit::Rejected { guard: index });
                }
                continue;
            }
            let result = self
                .coll(guard.entity)
                .update_one_with_session(
                    guard.filter.to_document(),
                    doc! {"$inc": {REVISION_FIELD: 1}},
                    None,
                    &mut session,
                )
                .await?;
            if result.matched_count == 0 {
                session.abort_transaction().await?;
                return Ok(Commit::Rejected { guard: index });
            }
        }

        for op in batch.into_ops() {
            match op {
                Op::Insert { entity, records } => {
                    let stamped: Vec<_> = records.into_iter().map(stamp).collect();
                    self.coll(entity)
                        .insert_many_with_session(stamped, None, &mut session)
                        .await?;
                }
                Op::Update {
                    entity,
                    filter,
                    patch,
                } => {
                    self.coll(entity)
                        .update_many_with_session(
                            filter.to_document(),
                            doc! {"$set": patch},
                            None,
                            &mut session,
                        )
                        .await?;
                }
                Op::Delete { entity, filter } => {
                    self.coll(entity)
                        .delete_many_with_session(filter.to_document(), None, &mut session)
                        .await?;
                }
            }
        }

        match session.commit_transaction().await {
            Ok(()) => Ok(Commit::Applied),
            Err(err) if err.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) => {
                Err(Error::OutcomeUnknown(err.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
