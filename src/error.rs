use mongodb::bson::{de::Error as BsonDeError, ser::Error as BsonSerError};
use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::{status::Custom, Responder},
    serde::json::Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::model::storage::Id;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input, or a selection that breaks a role's limits.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// The target is in the wrong state for this operation.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    /// The commission has been finalized and can no longer change.
    #[error("Commission {0} is finalized")]
    CommitteeFinalized(Id),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    BsonSer(#[from] BsonSerError),
    #[error(transparent)]
    BsonDe(#[from] BsonDeError),
    #[error("Storage failure: {0}")]
    Storage(String),
    /// The database could not confirm whether a transaction committed.
    #[error("Write outcome unknown: {0}")]
    OutcomeUnknown(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(why: impl Into<String>) -> Self {
        Self::Validation(why.into())
    }

    pub fn precondition(why: impl Into<String>) -> Self {
        Self::PreconditionFailed(why.into())
    }

    /// Machine-readable error kind, as reported to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::PreconditionFailed(_) => "precondition_failed",
            Self::CommitteeFinalized(_) => "committee_finalized",
            Self::NotFound(_) => "not_found",
            Self::Db(_) | Self::BsonSer(_) | Self::BsonDe(_) | Self::Storage(_) => "io",
            Self::OutcomeUnknown(_) => "outcome_unknown",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::PreconditionFailed(_) => Status::Conflict,
            Self::CommitteeFinalized(_) => Status::Locked,
            Self::NotFound(_) => Status::NotFound,
            Self::Db(_)
            | Self::BsonSer(_)
            | Self::BsonDe(_)
            | Self::Storage(_)
            | Self::OutcomeUnknown(_) => Status::InternalServerError,
        }
    }

    /// Whether anything may have been persisted before the error occurred.
    /// Writes are validated first and committed atomically, so only an
    /// unconfirmed commit leaves this open.
    pub fn maybe_saved(&self) -> bool {
        matches!(self, Self::OutcomeUnknown(_))
    }
}

/// The JSON body sent alongside an error status.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    saved: &'static str,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class().is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            saved: if self.maybe_saved() {
                "unknown"
            } else {
                "nothing"
            },
        };
        Custom(status, Json(body)).respond_to(req)
    }
}
