//! docshelf - an interactive journal and article catalogue
//!
//! The library holds the record schemas, the typed gateway over a document
//! store, the store transports and the menu dispatcher. The binary wires
//! them to the terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod store;
pub mod utils;

pub use crate::core::{
    data::{Article, ArticleData, GeneralTable, Journal, JournalData},
    operations::{QuerySpec, StoreGateway},
    traits::DocumentStore,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
