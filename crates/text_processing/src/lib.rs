//! Text processing for the reminder dialogue
//!
//! Pure, stateless helpers used on every customer turn:
//! - **Normalization**: canonical text for phrase matching
//! - **Hindi numbers**: day-number words in both scripts
//! - **Intent classification**: ordered rule cascade over phrase tables
//! - **Dates**: raw token extraction and resolution to a future calendar date
//! - **Locations**: fuzzy service-center matching across scripts

pub mod date;
pub mod hindi;
pub mod intent;
pub mod location;
pub mod normalize;

mod error;

pub use date::{extract_date_token, resolve_date_at, DateResolver};
pub use error::{Result, TextProcessingError};
pub use intent::{IntentClassifier, IntentPatterns};
pub use location::LocationMatcher;
pub use normalize::normalize;
