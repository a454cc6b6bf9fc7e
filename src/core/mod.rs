//! Core business logic layer
//!
//! Record types and their schema descriptors, the query model, the store
//! contract and the typed gateway built on top of it.

pub mod data;
pub mod operations;
pub mod query;
pub mod samples;
pub mod schema;
pub mod traits;
