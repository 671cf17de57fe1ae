use mongodb::bson::{doc, Bson, Document};

/// A single equality-style condition on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field equals the value. A missing field equals `null`.
    Eq(String, Bson),
    /// The field equals any of the values.
    In(String, Vec<Bson>),
}

impl Condition {
    fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq(field, value) => field_equals(doc, field, value),
            Self::In(field, values) => values.iter().any(|v| field_equals(doc, field, v)),
        }
    }
}

/// A conjunction of conditions selecting records of one entity set.
/// The empty filter selects everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the record with the given ID.
    pub fn by_id(id: impl Into<Bson>) -> Self {
        Self::new().eq("_id", id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.conditions.push(Condition::Eq(field.into(), value.into()));
        self
    }

    pub fn one_of<V: Into<Bson>>(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(field.into(), values));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the filter against a stored document.
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }

    /// Render as a MongoDB query document.
    pub fn to_document(&self) -> Document {
        let mut query = Document::new();
        for condition in &self.conditions {
            match condition {
                Condition::Eq(field, value) => {
                    query.insert(field.clone(), value.clone());
                }
                Condition::In(field, values) => {
                    query.insert(field.clone(), doc! { "$in": values.clone() });
                }
            }
        }
        query
    }
}

fn field_equals(doc: &Document, field: &str, expected: &Bson) -> bool {
    let actual = doc.get(field).unwrap_or(&Bson::Null);
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

/// Integers may come back from serialization as either width.
fn as_number(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}
