use super::{ConnectOptions, DEFAULT_HTTP_PORT};
use crate::core::query::{Condition, Query, QueryResult};
use crate::core::schema::{FieldDef, FieldType, IndexKind, Schema};
use crate::core::traits::DocumentStore;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::sync::RwLock;

const API_PATH: &str = "api/v1";

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct DatabaseList {
    #[serde(default)]
    items: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteIndex {
    name: String,
    #[serde(default)]
    field_type: String,
    #[serde(default)]
    index_type: String,
    #[serde(default)]
    is_pk: bool,
}

#[derive(Debug, Deserialize)]
struct RemoteNamespace {
    #[serde(default)]
    indexes: Vec<RemoteIndex>,
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    items: Vec<Value>,
    query_total_items: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    updated: usize,
}

/// Client for the Reindexer HTTP REST API
pub struct HttpStore {
    client: Client,
    base_url: Url,
    database: String,
    user: Option<String>,
    password: Option<String>,
    primary_keys: RwLock<HashMap<String, String>>,
}

impl HttpStore {
    /// Build a client for `dsn`.
    ///
    /// An `http://` DSN names the API port directly. A `cproto://` DSN names
    /// the binary RPC port, so the API port comes from `options` instead.
    pub fn new(dsn: &Url, options: &ConnectOptions) -> AppResult<Self> {
        let host = dsn
            .host_str()
            .ok_or_else(|| AppError::Connection("Connection string has no host".to_string()))?;
        let port = match dsn.scheme() {
            "http" => dsn.port_or_known_default().unwrap_or(DEFAULT_HTTP_PORT),
            _ => options.http_port.unwrap_or(DEFAULT_HTTP_PORT),
        };
        let database = dsn.path().trim_matches('/').to_string();
        if database.is_empty() {
            return Err(AppError::Connection(
                "Connection string has no database name".to_string(),
            ));
        }

        let base_url = Url::parse(&format!("http://{}:{}/{}/", host, port, API_PATH))
            .map_err(|e| AppError::Connection(format!("Invalid server address: {}", e)))?;
        let user = Some(dsn.username().to_string()).filter(|u| !u.is_empty());

        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("docshelf/", env!("CARGO_PKG_VERSION")))
                .no_proxy()
                .build()
                .map_err(|e| AppError::Connection(format!("Failed to create HTTP client: {}", e)))?,
            base_url,
            database,
            user,
            password: dsn.password().map(str::to_string),
            primary_keys: RwLock::new(HashMap::new()),
        })
    }

    pub async fn connect(dsn: &Url, options: &ConnectOptions) -> AppResult<Self> {
        let store = Self::new(dsn, options)?;
        store
            .status()
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;
        if options.create_db_if_missing {
            store.create_database_if_missing().await?;
        }
        Ok(store)
    }

    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Connection("Server address cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn db_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut all = vec!["db", self.database.as_str()];
        all.extend_from_slice(segments);
        self.url(&all)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.user {
            Some(user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }

    /// Send a request and turn transport failures and error statuses into `AppError`.
    ///
    /// `namespace` makes a 404 answer a [`AppError::NamespaceNotFound`];
    /// everything else is reported through `kind`.
    async fn send(
        &self,
        builder: RequestBuilder,
        namespace: Option<&str>,
        kind: fn(String) -> AppError,
    ) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| kind(format!("Failed to reach Reindexer server: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(ns)) = (status, namespace) {
            return Err(AppError::NamespaceNotFound(ns.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.description)
            .unwrap_or(body);
        Err(kind(format!("{} - {}", status, description)))
    }

    async fn create_database_if_missing(&self) -> AppResult<()> {
        let response = self
            .send(self.request(Method::GET, self.url(&["db"])?), None, AppError::Connection)
            .await?;
        let databases: DatabaseList = response
            .json()
            .await
            .map_err(|e| AppError::Connection(format!("Failed to parse database list: {}", e)))?;

        if databases.items.iter().any(|db| db == &self.database) {
            return Ok(());
        }

        tracing::info!(database = %self.database, "creating database");
        self.send(
            self.request(Method::POST, self.url(&["db"])?)
                .json(&json!({ "name": self.database })),
            None,
            AppError::Connection,
        )
        .await?;
        Ok(())
    }

    async fn primary_key(&self, namespace: &str) -> String {
        self.primary_keys
            .read()
            .await
            .get(namespace)
            .cloned()
            .unwrap_or_else(|| "id".to_string())
    }
}

fn field_type_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Int => "int",
        FieldType::Int64 => "int64",
        FieldType::String => "string",
        FieldType::Embedded => "composite",
    }
}

fn index_type_name(index: IndexKind) -> &'static str {
    match index {
        IndexKind::Hash => "hash",
        IndexKind::Tree => "tree",
        IndexKind::Ttl { .. } => "ttl",
    }
}

fn index_definition(def: &FieldDef, index: IndexKind) -> Value {
    let expire_after = match index {
        IndexKind::Ttl { expire_after } => expire_after,
        _ => 0,
    };
    json!({
        "name": def.name,
        "json_paths": [def.name],
        "field_type": field_type_name(def.field_type),
        "index_type": index_type_name(index),
        "is_pk": def.is_pk,
        "is_array": def.is_array,
        "expire_after": expire_after,
    })
}

fn index_definitions(schema: &Schema) -> Vec<(&FieldDef, Value)> {
    schema
        .fields
        .iter()
        .filter_map(|def| def.index.map(|index| (def, index_definition(def, index))))
        .collect()
}

fn namespace_definition(namespace: &str, schema: &Schema) -> Value {
    let indexes: Vec<Value> = index_definitions(schema).into_iter().map(|(_, v)| v).collect();
    json!({
        "name": namespace,
        "storage": { "enabled": true },
        "indexes": indexes,
    })
}

fn schema_conflict(schema: &Schema, remote: &[RemoteIndex]) -> Option<String> {
    schema.indexed_fields().find_map(|def| {
        let index = def.index?;
        let existing = remote.iter().find(|r| r.name == def.name)?;
        let wanted = (field_type_name(def.field_type), index_type_name(index), def.is_pk);
        let found = (
            existing.field_type.as_str(),
            existing.index_type.as_str(),
            existing.is_pk,
        );
        (wanted != found).then(|| {
            format!(
                "index '{}' is {}/{} on the server but {}/{} is required",
                def.name, found.0, found.1, wanted.0, wanted.1
            )
        })
    })
}

/// Reindexer query DSL for a select
fn query_dsl(query: &Query) -> Value {
    let req_total = if query.req_total { "enabled" } else { "disabled" };
    let mut dsl = json!({
        "namespace": query.namespace,
        "type": "select",
        "offset": query.offset,
        "req_total": req_total,
    });

    if let Some(limit) = query.limit {
        dsl["limit"] = json!(limit);
    }
    if let Some(filter) = &query.filter {
        let Condition::Like(pattern) = &filter.condition;
        dsl["filters"] = json!([{ "field": filter.field, "cond": "LIKE", "value": pattern }]);
    }
    if let Some(sort) = &query.sort {
        dsl["sort"] = json!([{ "field": sort.field, "desc": sort.descending }]);
    }
    dsl
}

fn update_dsl(query: &Query, field: &str, value: &Value) -> Value {
    let values = match value {
        Value::Array(values) => values.clone(),
        other => vec![other.clone()],
    };
    let mut dsl = query_dsl(query);
    dsl["type"] = json!("update");
    dsl["update_fields"] = json!([{ "name": field, "type": "value", "values": values }]);
    dsl
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn status(&self) -> AppResult<()> {
        self.send(
            self.request(Method::GET, self.url(&["check"])?),
            None,
            AppError::StoreUnavailable,
        )
        .await?;
        Ok(())
    }

    async fn open_namespace(&self, namespace: &str, schema: &Schema) -> AppResult<()> {
        let ns_url = self.db_url(&["namespaces", namespace])?;
        let lookup = self
            .send(
                self.request(Method::GET, ns_url),
                Some(namespace),
                AppError::StoreUnavailable,
            )
            .await;

        match lookup {
            Ok(response) => {
                let remote: RemoteNamespace = response.json().await.map_err(|e| {
                    AppError::StoreUnavailable(format!("Failed to parse namespace description: {}", e))
                })?;
                if let Some(reason) = schema_conflict(schema, &remote.indexes) {
                    return Err(AppError::SchemaConflict {
                        namespace: namespace.to_string(),
                        reason,
                    });
                }
                for (def, index) in index_definitions(schema) {
                    if remote.indexes.iter().any(|r| r.name == def.name) {
                        continue;
                    }
                    tracing::debug!(namespace, index = def.name, "adding missing index");
                    self.send(
                        self.request(Method::POST, self.db_url(&["namespaces", namespace, "indexes"])?)
                            .json(&index),
                        Some(namespace),
                        AppError::StoreUnavailable,
                    )
                    .await?;
                }
            }
            Err(AppError::NamespaceNotFound(_)) => {
                tracing::debug!(namespace, "creating namespace");
                self.send(
                    self.request(Method::POST, self.db_url(&["namespaces"])?)
                        .json(&namespace_definition(namespace, schema)),
                    None,
                    AppError::StoreUnavailable,
                )
                .await?;
            }
            Err(err) => return Err(err),
        }

        if let Some(pk) = schema.primary_key() {
            self.primary_keys
                .write()
                .await
                .insert(namespace.to_string(), pk.name.to_string());
        }
        Ok(())
    }

    async fn insert(&self, namespace: &str, item: Value) -> AppResult<i64> {
        let pk = self.primary_key(namespace).await;
        let precept = format!("{}=serial()", pk);
        let response = self
            .send(
                self.request(Method::POST, self.db_url(&["namespaces", namespace, "items"])?)
                    .query(&[("precepts", precept.as_str()), ("format", "json")])
                    .json(&item),
                Some(namespace),
                AppError::Write,
            )
            .await?;

        let body: ItemsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Write(format!("Failed to parse insert response: {}", e)))?;
        body.items
            .first()
            .and_then(|item| item.get(&pk))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                AppError::Write(format!(
                    "Server did not report the '{}' assigned in '{}'",
                    pk, namespace
                ))
            })
    }

    async fn select(&self, query: &Query) -> AppResult<QueryResult> {
        let response = self
            .send(
                self.request(Method::POST, self.db_url(&["query"])?)
                    .json(&query_dsl(query)),
                Some(query.namespace.as_str()),
                AppError::Query,
            )
            .await?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Query(format!("Failed to parse query response: {}", e)))?;
        let total = body.query_total_items.unwrap_or(body.items.len());
        Ok(QueryResult {
            items: body.items,
            total,
        })
    }

    async fn update(&self, query: &Query, field: &str, value: Value) -> AppResult<usize> {
        let response = self
            .send(
                self.request(Method::PUT, self.db_url(&["query"])?)
                    .json(&update_dsl(query, field, &value)),
                Some(query.namespace.as_str()),
                AppError::Write,
            )
            .await?;

        let body: UpdateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Write(format!("Failed to parse update response: {}", e)))?;
        Ok(body.updated)
    }

    async fn truncate_namespace(&self, namespace: &str) -> AppResult<()> {
        self.send(
            self.request(Method::DELETE, self.db_url(&["namespaces", namespace, "truncate"])?),
            Some(namespace),
            AppError::Write,
        )
        .await?;
        Ok(())
    }

    async fn drop_namespace(&self, namespace: &str) -> AppResult<()> {
        self.send(
            self.request(Method::DELETE, self.db_url(&["namespaces", namespace])?),
            Some(namespace),
            AppError::Write,
        )
        .await?;
        self.primary_keys.write().await.remove(namespace);
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        tracing::debug!(database = %self.database, "closing HTTP store");
        Ok(())
    }
}
