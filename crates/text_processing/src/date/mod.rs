//! Date extraction and resolution
//!
//! Two steps: [`extract_date_token`] pulls the raw date expression out of an
//! utterance, [`DateResolver`] turns it into a concrete calendar date that is
//! always after "today" in the anchor timezone.

mod extractor;
mod resolver;
mod vocab;

pub use extractor::extract_date_token;
pub use resolver::{resolve_date_at, DateResolver};
pub use vocab::RelativeDay;
