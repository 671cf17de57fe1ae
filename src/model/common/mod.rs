mod anonymity;
pub mod name;
mod status;

pub use anonymity::AnonymityMode;
pub use status::{CommissionStatus, SurveyStatus};
