//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - IDs are serialised as hex strings.
//! - Datetimes are serialised as RFC 3339 timestamps.

pub mod ballot;
pub mod commission;
pub mod id;
pub mod member;
pub mod results;
pub mod role;
pub mod survey;
pub mod tenant;
pub mod voting;
