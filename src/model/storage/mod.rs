mod backend;
mod batch;
mod filter;
mod id;
mod memory;
mod mongo;
mod store;

pub use backend::{StorageBackend, CREATED_AT_FIELD, ID_FIELD};
pub use batch::{Batch, Commit, Guard, Op};
pub use filter::{Condition, Filter};
pub use id::Id;
pub use memory::MemoryBackend;
pub use mongo::MongoBackend;
pub(crate) use store::to_documents;
pub use store::{Entity, Store, Unguarded, WriteBatch};
