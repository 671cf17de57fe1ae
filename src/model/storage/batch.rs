use mongodb::bson::Document;

use super::Filter;

/// A precondition on a batch: at least one record of `entity` must match
/// `filter` at the moment the batch is applied, or none may if `absent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    pub entity: &'static str,
    pub filter: Filter,
    pub absent: bool,
}

impl Guard {
    /// Whether the guard holds, given whether any record matched.
    pub fn holds(&self, found: bool) -> bool {
        found != self.absent
    }
}

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Insert {
        entity: &'static str,
        records: Vec<Document>,
    },
    /// Set the fields of `patch` on every record matching `filter`.
    Update {
        entity: &'static str,
        filter: Filter,
        patch: Document,
    },
    Delete {
        entity: &'static str,
        filter: Filter,
    },
}

/// Writes applied all-or-nothing, after every guard has been checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    guards: Vec<Guard>,
    ops: Vec<Op>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&mut self, entity: &'static str, filter: Filter) -> &mut Self {
        self.guards.push(Guard {
            entity,
            filter,
            absent: false,
        });
        self
    }

    /// Require that no record of `entity` matches `filter`.
    ///
    /// Checked after every presence guard added before it.
    pub fn guard_absent(&mut self, entity: &'static str, filter: Filter) -> &mut Self {
        self.guards.push(Guard {
            entity,
            filter,
            absent: true,
        });
        self
    }

    pub fn insert(&mut self, entity: &'static str, records: Vec<Document>) -> &mut Self {
        if !records.is_empty() {
            self.ops.push(Op::Insert { entity, records });
        }
        self
    }

    pub fn update(&mut self, entity: &'static str, filter: Filter, patch: Document) -> &mut Self {
        self.ops.push(Op::Update {
            entity,
            filter,
            patch,
        });
        self
    }

    pub fn delete(&mut self, entity: &'static str, filter: Filter) -> &mut Self {
        self.ops.push(Op::Delete { entity, filter });
        self
    }

    /// Move every guard and write of `other` onto the end of this batch.
    pub fn append(&mut self, other: Batch) {
        self.guards.extend(other.guards);
        self.ops.extend(other.ops);
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }
}

/// The result of applying a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// The guard at this index matched nothing; no write was made.
    Rejected { guard: usize },
}

impl Commit {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
