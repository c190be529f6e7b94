//! CLI integration tests.

mod support;

#[path = "cli/browse.rs"]
mod browse;
#[path = "cli/config.rs"]
mod config;
#[path = "cli/errors.rs"]
mod errors;
#[path = "cli/listing.rs"]
mod listing;
#[path = "cli/secrets.rs"]
mod secrets;
