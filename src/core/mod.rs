//! Core library components.
//!
//! Everything that decides what the browser shows lives here, independent of
//! any terminal. The store is reached only through [`store::SecretStore`],
//! and only from [`worker`] threads; all other state is owned by one
//! [`session::Session`].

pub mod cache;
pub mod config;
pub mod constants;
pub mod domain;
pub mod edit;
pub mod job;
pub mod machine;
pub mod navigator;
pub mod path;
pub mod session;
pub mod store;
pub mod types;
pub mod worker;
