//! Store gateway
//!
//! A narrow, typed facade over [`DocumentStore`]. It mirrors the operations
//! the menu offers and nothing more: open a namespace, insert a record, run a
//! paged query, update one field, truncate or drop a namespace.

use crate::core::data::{Article, ArticleData, GeneralTable, Journal, JournalData};
use crate::core::query::{Filter, PAGE_SIZE, Query};
use crate::core::schema::Record;
use crate::core::traits::DocumentStore;
use crate::utils::error::{AppError, AppResult};
use serde_json::Value;
use std::sync::Arc;

/// Parameters of a paged query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub sort_field: Option<String>,
    pub sort_descending: bool,
    pub filter: Option<(String, String)>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            sort_field: None,
            sort_descending: false,
            filter: None,
            limit: PAGE_SIZE,
            offset: 0,
        }
    }
}

impl QuerySpec {
    pub fn sorted_by(field: &str, descending: bool) -> Self {
        Self {
            sort_field: Some(field.to_string()),
            sort_descending: descending,
            ..Self::default()
        }
    }

    pub fn containing(mut self, field: &str, pattern: &str) -> Self {
        self.filter = Some((field.to_string(), pattern.to_string()));
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    fn to_query(&self, namespace: &str) -> Query {
        let mut query = Query::new(namespace)
            .limit(self.limit.min(PAGE_SIZE))
            .offset(self.offset)
            .req_total();
        if let Some(field) = &self.sort_field {
            query = query.sort(field, self.sort_descending);
        }
        if let Some((field, pattern)) = &self.filter {
            query = query.filter(Filter::contains(field, pattern));
        }
        query
    }
}

/// One page of typed results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub total: usize,
}

/// Outcome of seeding the demo data
#[derive(Debug, Default)]
pub struct SeedReport {
    pub articles: usize,
    pub journals: usize,
    pub errors: Vec<AppError>,
}

pub struct StoreGateway {
    store: Arc<dyn DocumentStore>,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn open_namespace<R: Record>(&self) -> AppResult<()> {
        self.store.open_namespace(R::NAMESPACE, &R::schema()).await
    }

    /// Open every namespace the application uses.
    ///
    /// A failing namespace does not stop the others; each outcome is returned
    /// for the caller to report.
    pub async fn open_all(&self) -> Vec<(&'static str, AppResult<()>)> {
        vec![
            (Article::NAMESPACE, self.open_namespace::<Article>().await),
            (Journal::NAMESPACE, self.open_namespace::<Journal>().await),
            (GeneralTable::NAMESPACE, self.open_namespace::<GeneralTable>().await),
        ]
    }

    pub async fn insert<R: Record>(&self, record: &R) -> AppResult<i64> {
        let item = serde_json::to_value(record)
            .map_err(|e| AppError::Write(format!("Failed to serialize record: {}", e)))?;
        let id = self.store.insert(R::NAMESPACE, item).await?;
        tracing::debug!(namespace = R::NAMESPACE, id, "record inserted");
        Ok(id)
    }

    pub async fn add_article(&self, data: &ArticleData) -> AppResult<i64> {
        self.insert(&Article::from_data(data)).await
    }

    pub async fn add_journal(&self, data: &JournalData) -> AppResult<i64> {
        self.insert(&Journal::from_data(data)).await
    }

    pub async fn query<R: Record>(&self, spec: &QuerySpec) -> AppResult<Page<R>> {
        let result = self.store.select(&spec.to_query(R::NAMESPACE)).await?;
        let items = result
            .items
            .into_iter()
            .map(serde_json::from_value::<R>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                AppError::Query(format!("Malformed record in '{}': {}", R::NAMESPACE, e))
            })?;
        Ok(Page {
            items,
            total: result.total,
        })
    }

    /// Overwrite `target_field` on every record whose `filter_field` contains
    /// `pattern`. The raw value is coerced to the field's type first.
    pub async fn update_field<R: Record>(
        &self,
        filter_field: &str,
        pattern: &str,
        target_field: &str,
        raw_value: &str,
    ) -> AppResult<usize> {
        let value: Value = R::schema().coerce(target_field, raw_value)?;
        let query = Query::new(R::NAMESPACE).filter(Filter::contains(filter_field, pattern));
        let updated = self.store.update(&query, target_field, value).await?;
        tracing::debug!(namespace = R::NAMESPACE, target_field, updated, "field updated");
        Ok(updated)
    }

    pub async fn truncate(&self, namespace: &str) -> AppResult<()> {
        self.store.truncate_namespace(namespace).await?;
        tracing::info!(namespace, "namespace truncated");
        Ok(())
    }

    pub async fn drop_namespace(&self, namespace: &str) -> AppResult<()> {
        self.store.drop_namespace(namespace).await?;
        tracing::info!(namespace, "namespace dropped");
        Ok(())
    }

    /// Insert the built-in articles and journals, collecting failures
    pub async fn seed(&self, articles: &[ArticleData], journals: &[JournalData]) -> SeedReport {
        let mut report = SeedReport::default();
        for article in articles {
            match self.add_article(article).await {
                Ok(_) => report.articles += 1,
                Err(e) => report.errors.push(e),
            }
        }
        for journal in journals {
            match self.add_journal(journal).await {
                Ok(_) => report.journals += 1,
                Err(e) => report.errors.push(e),
            }
        }
        report
    }

    pub async fn close(&self) -> AppResult<()> {
        self.store.close().await
    }
}
