//! Core trait definitions for document storage
//!
//! The store engine is external to this crate. [`DocumentStore`] is the
//! whole contract the rest of the application relies on, so the engine can
//! be a remote server or an in-process implementation.

use crate::core::query::{Query, QueryResult};
use crate::core::schema::Schema;
use crate::utils::error::AppResult;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check that the store is reachable
    async fn status(&self) -> AppResult<()>;

    /// Create the namespace or verify it against `schema`. Idempotent.
    async fn open_namespace(&self, namespace: &str, schema: &Schema) -> AppResult<()>;

    /// Insert one item, letting the store assign its serial primary key.
    /// Returns the assigned key.
    async fn insert(&self, namespace: &str, item: Value) -> AppResult<i64>;

    /// Run a select query
    async fn select(&self, query: &Query) -> AppResult<QueryResult>;

    /// Set `field` to `value` on every item matched by `query`.
    /// Returns the number of updated items.
    async fn update(&self, query: &Query, field: &str, value: Value) -> AppResult<usize>;

    /// Remove every item but keep the namespace and its indexes
    async fn truncate_namespace(&self, namespace: &str) -> AppResult<()>;

    /// Remove the namespace together with its indexes
    async fn drop_namespace(&self, namespace: &str) -> AppResult<()>;

    /// Release the connection
    async fn close(&self) -> AppResult<()>;
}
