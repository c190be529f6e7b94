//! Domain types.

mod listing;
mod notice;
mod record;

pub use listing::Listing;
pub use notice::{Level, Notice};
pub use record::{Metadata, SecretRecord, SecretValue};
