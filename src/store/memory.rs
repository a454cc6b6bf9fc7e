//! In-process document store
//!
//! Implements the full [`DocumentStore`] contract without a server: serial
//! primary keys, schema compatibility checks, LIKE filtering, single-field
//! sorting, offset pagination and TTL expiry. Used by the `builtin://`
//! transport and throughout the tests.

use crate::core::query::{Condition, Filter, Query, QueryResult};
use crate::core::schema::Schema;
use crate::core::traits::DocumentStore;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

struct Namespace {
    schema: Schema,
    items: Vec<Value>,
    next_id: i64,
}

impl Namespace {
    fn new(schema: Schema) -> Self {
        Self {
            schema,
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Drop rows whose TTL timestamp is `expire_after` seconds or more in the past
    fn purge_expired(&mut self, now: i64) {
        let Some((field, expire_after)) = self.schema.ttl() else {
            return;
        };
        let lifetime = expire_after as i64;
        self.items.retain(|item| match item.get(field).and_then(Value::as_i64) {
            Some(stamp) => now - stamp < lifetime,
            None => true,
        });
    }
}

pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, Namespace>>,
    clock: Clock,
    closed: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
            clock: Box::new(|| Utc::now().timestamp()),
            closed: AtomicBool::new(false),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom source of "now" (unix seconds) for TTL expiry
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            ..Self::default()
        }
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(AtomicOrdering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "store connection is closed".to_string(),
            ));
        }
        Ok(())
    }
}

fn like_regex(pattern: &str) -> AppResult<Regex> {
    let mut expr = String::from("(?s)^");
    let mut literal = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '%' => expr.push_str(".*"),
            '_' => expr.push('.'),
            c => expr.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| AppError::Query(format!("Invalid LIKE pattern '{}': {}", pattern, e)))
}

/// Compiled form of an optional filter
struct Matcher {
    field: String,
    regex: Regex,
}

impl Matcher {
    fn compile(filter: Option<&Filter>) -> AppResult<Option<Self>> {
        let Some(filter) = filter else {
            return Ok(None);
        };
        let Condition::Like(pattern) = &filter.condition;
        Ok(Some(Self {
            field: filter.field.clone(),
            regex: like_regex(pattern)?,
        }))
    }

    fn matches(&self, item: &Value) -> bool {
        match item.get(&self.field) {
            Some(Value::String(s)) => self.regex.is_match(s),
            Some(Value::Array(values)) => values
                .iter()
                .any(|v| v.as_str().is_some_and(|s| self.regex.is_match(s))),
            _ => false,
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn status(&self) -> AppResult<()> {
        self.ensure_open()
    }

    async fn open_namespace(&self, namespace: &str, schema: &Schema) -> AppResult<()> {
        self.ensure_open()?;
        let mut namespaces = self.namespaces.write().await;

        match namespaces.get_mut(namespace) {
            Some(existing) => {
                if let Some(reason) = schema.conflict_with(&existing.schema) {
                    return Err(AppError::SchemaConflict {
                        namespace: namespace.to_string(),
                        reason,
                    });
                }
                for def in &schema.fields {
                    if existing.schema.get(def.name).is_none() {
                        existing.schema.fields.push(def.clone());
                    }
                }
            }
            None => {
                tracing::debug!(namespace, "creating namespace");
                namespaces.insert(namespace.to_string(), Namespace::new(schema.clone()));
            }
        }
        Ok(())
    }

    async fn insert(&self, namespace: &str, mut item: Value) -> AppResult<i64> {
        self.ensure_open()?;
        let mut namespaces = self.namespaces.write().await;
        let ns = namespaces
            .get_mut(namespace)
            .ok_or_else(|| AppError::NamespaceNotFound(namespace.to_string()))?;

        let pk = ns
            .schema
            .primary_key()
            .map(|f| f.name)
            .ok_or_else(|| AppError::Write(format!("Namespace '{}' has no primary key", namespace)))?;
        let object = item
            .as_object_mut()
            .ok_or_else(|| AppError::Write("Only JSON objects can be stored".to_string()))?;

        let id = ns.next_id;
        ns.next_id += 1;
        object.insert(pk.to_string(), Value::from(id));
        ns.items.push(item);
        Ok(id)
    }

    async fn select(&self, query: &Query) -> AppResult<QueryResult> {
        self.ensure_open()?;
        let now = (self.clock)();
        let mut namespaces = self.namespaces.write().await;
        let ns = namespaces
            .get_mut(&query.namespace)
            .ok_or_else(|| AppError::NamespaceNotFound(query.namespace.clone()))?;
        ns.purge_expired(now);

        let matcher = Matcher::compile(query.filter.as_ref())?;
        let mut matched: Vec<&Value> = ns
            .items
            .iter()
            .filter(|item| matcher.as_ref().is_none_or(|m| m.matches(item)))
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.descending { ord.reverse() } else { ord }
            });
        }

        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(QueryResult { items, total })
    }

    async fn update(&self, query: &Query, field: &str, value: Value) -> AppResult<usize> {
        self.ensure_open()?;
        let now = (self.clock)();
        let mut namespaces = self.namespaces.write().await;
        let ns = namespaces
            .get_mut(&query.namespace)
            .ok_or_else(|| AppError::NamespaceNotFound(query.namespace.clone()))?;
        ns.purge_expired(now);

        let matcher = Matcher::compile(query.filter.as_ref())?;
        let mut updated = 0;
        for item in ns.items.iter_mut() {
            if !matcher.as_ref().is_none_or(|m| m.matches(item)) {
                continue;
            }
            if let Some(object) = item.as_object_mut() {
                object.insert(field.to_string(), value.clone());
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn truncate_namespace(&self, namespace: &str) -> AppResult<()> {
        self.ensure_open()?;
        let mut namespaces = self.namespaces.write().await;
        let ns = namespaces
            .get_mut(namespace)
            .ok_or_else(|| AppError::NamespaceNotFound(namespace.to_string()))?;
        ns.items.clear();
        Ok(())
    }

    async fn drop_namespace(&self, namespace: &str) -> AppResult<()> {
        self.ensure_open()?;
        self.namespaces
            .write()
            .await
            .remove(namespace)
            .map(|_| ())
            .ok_or_else(|| AppError::NamespaceNotFound(namespace.to_string()))
    }

    async fn close(&self) -> AppResult<()> {
        self.closed.store(true, AtomicOrdering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldDef;
    use serde_json::json;

    fn journal_schema() -> Schema {
        Schema::new()
            .field(FieldDef::int("id").primary_key())
            .field(FieldDef::string("title"))
            .field(FieldDef::int("year").sortable())
            .field(FieldDef::int64("date").ttl(900))
    }

    async fn store_with(titles: &[(&str, i64)]) -> MemoryStore {
        let store = MemoryStore::new();
        store.open_namespace("journals", &journal_schema()).await.unwrap();
        let now = Utc::now().timestamp();
        for (title, year) in titles {
            store
                .insert("journals", json!({"id": 0, "title": title, "year": year, "date": now}))
                .await
                .unwrap();
        }
        store
    }

    fn titles(result: &QueryResult) -> Vec<&str> {
        result
            .items
            .iter()
            .filter_map(|item| item.get("title").and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn test_like_pattern_translation() {
        let re = like_regex("%Comp%").unwrap();
        assert!(re.is_match("Computers"));
        assert!(re.is_match("Big Computers"));
        assert!(!re.is_match("Trending Modern computer Technologies"));

        let re = like_regex("a_c").unwrap();
        assert!(re.is_match("abc"));
        assert!(!re.is_match("abbc"));

        let re = like_regex("%(1+1)%").unwrap();
        assert!(re.is_match("sum (1+1) = 2"));
    }

    #[tokio::test]
    async fn test_insert_assigns_serial_keys() {
        let store = MemoryStore::new();
        store.open_namespace("journals", &journal_schema()).await.unwrap();
        let first = store.insert("journals", json!({"id": 99, "title": "a"})).await.unwrap();
        let second = store.insert("journals", json!({"title": "b"})).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let result = store.select(&Query::new("journals").sort("id", false)).await.unwrap();
        assert_eq!(result.items[0]["id"], json!(1));
    }

    #[tokio::test]
    async fn test_open_namespace_is_idempotent() {
        let store = store_with(&[("Computers", 2020)]).await;
        store.open_namespace("journals", &journal_schema()).await.unwrap();

        let result = store.select(&Query::new("journals")).await.unwrap();
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn test_open_namespace_detects_conflicts() {
        let store = store_with(&[]).await;
        let conflicting = Schema::new()
            .field(FieldDef::int("id").primary_key())
            .field(FieldDef::string("year"));

        let err = store.open_namespace("journals", &conflicting).await.unwrap_err();
        assert!(matches!(err, AppError::SchemaConflict { .. }));
    }

    #[tokio::test]
    async fn test_filter_is_case_sensitive_substring() {
        let store = store_with(&[
            ("Trending Modern computer Technologies", 2022),
            ("Computers", 2020),
            ("IT industry", 1996),
        ])
        .await;

        let query = Query::new("journals").filter(Filter::contains("title", "Comp")).req_total();
        let result = store.select(&query).await.unwrap();
        assert_eq!(titles(&result), vec!["Computers"]);
        assert_eq!(result.total, 1);

        let query = Query::new("journals").filter(Filter::contains("title", "nothing"));
        let result = store.select(&query).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn test_filter_matches_array_elements() {
        let store = MemoryStore::new();
        let schema = Schema::new()
            .field(FieldDef::int("id").primary_key())
            .field(FieldDef::string("authors").array());
        store.open_namespace("articles", &schema).await.unwrap();
        store.insert("articles", json!({"authors": ["Kolade Chris"]})).await.unwrap();
        store.insert("articles", json!({"authors": ["Joe Johnston"]})).await.unwrap();

        let query = Query::new("articles").filter(Filter::contains("authors", "Chris"));
        assert_eq!(store.select(&query).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_sort_directions() {
        let store = store_with(&[("a", 2022), ("b", 2020), ("c", 1996)]).await;

        let asc = store.select(&Query::new("journals").sort("year", false)).await.unwrap();
        assert_eq!(titles(&asc), vec!["c", "b", "a"]);

        let desc = store.select(&Query::new("journals").sort("year", true)).await.unwrap();
        assert_eq!(titles(&desc), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_pagination_pages_are_disjoint() {
        let names: Vec<String> = (0..15).map(|i| format!("journal {}", i)).collect();
        let rows: Vec<(&str, i64)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), 2000 + i as i64))
            .collect();
        let store = store_with(&rows).await;

        let base = Query::new("journals").sort("year", false).limit(10).req_total();
        let first = store.select(&base.clone().offset(0)).await.unwrap();
        let second = store.select(&base.offset(10)).await.unwrap();

        assert_eq!(first.items.len(), 10);
        assert_eq!(second.items.len(), 5);
        assert_eq!(first.total, 15);
        assert_eq!(second.total, 15);
        let first_titles = titles(&first);
        assert!(titles(&second).iter().all(|t| !first_titles.contains(t)));
    }

    #[tokio::test]
    async fn test_update_matching_rows() {
        let store = store_with(&[("Computers", 2020), ("IT industry", 1996)]).await;
        let query = Query::new("journals").filter(Filter::contains("title", "Comp"));

        let updated = store.update(&query, "year", json!(2001)).await.unwrap();
        assert_eq!(updated, 1);

        let result = store.select(&query).await.unwrap();
        assert_eq!(result.items[0]["year"], json!(2001));
    }

    #[tokio::test]
    async fn test_update_without_matches_is_noop() {
        let store = store_with(&[("Computers", 2020)]).await;
        let query = Query::new("journals").filter(Filter::contains("title", "Biology"));
        assert_eq!(store.update(&query, "year", json!(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_truncate_keeps_namespace() {
        let store = store_with(&[("Computers", 2020)]).await;
        store.truncate_namespace("journals").await.unwrap();

        let result = store.select(&Query::new("journals").req_total()).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
        store.insert("journals", json!({"title": "again"})).await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_removes_namespace() {
        let store = store_with(&[("Computers", 2020)]).await;
        store.drop_namespace("journals").await.unwrap();

        let err = store.select(&Query::new("journals")).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.insert("journals", json!({})).await.unwrap_err().is_not_found());
        assert!(store.truncate_namespace("journals").await.unwrap_err().is_not_found());
        assert!(store.drop_namespace("journals").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_missing_namespace_is_not_found() {
        let store = MemoryStore::new();
        assert!(store.truncate_namespace("nope").await.unwrap_err().is_not_found());
        let query = Query::new("nope");
        assert!(store.update(&query, "year", json!(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_expired_rows_are_purged() {
        let later = Utc::now().timestamp() + 901;
        let store = MemoryStore::with_clock(move || later);
        store.open_namespace("journals", &journal_schema()).await.unwrap();
        let stale = Utc::now().timestamp();
        store.insert("journals", json!({"title": "old", "date": stale})).await.unwrap();
        store.insert("journals", json!({"title": "fresh", "date": later})).await.unwrap();

        let result = store.select(&Query::new("journals")).await.unwrap();
        assert_eq!(titles(&result), vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let store = MemoryStore::new();
        store.close().await.unwrap();
        assert!(matches!(
            store.status().await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
