//! Query description shared by every store implementation

use serde_json::Value;

/// Largest page a caller may request
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

/// Filter predicates understood by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// SQL-style pattern: `%` matches any run of characters, `_` exactly one.
    /// Matching is case-sensitive.
    Like(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub condition: Condition,
}

impl Filter {
    /// Substring match on `field`
    pub fn contains(field: &str, text: &str) -> Self {
        Self {
            field: field.to_string(),
            condition: Condition::Like(format!("%{}%", text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub namespace: String,
    pub sort: Option<Sort>,
    pub filter: Option<Filter>,
    pub limit: Option<usize>,
    pub offset: usize,
    pub req_total: bool,
}

impl Query {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            sort: None,
            filter: None,
            limit: None,
            offset: 0,
            req_total: false,
        }
    }

    pub fn sort(mut self, field: &str, descending: bool) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            descending,
        });
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Ask the store to count every match, not just the returned page
    pub fn req_total(mut self) -> Self {
        self.req_total = true;
        self
    }
}

/// Raw rows returned by the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub items: Vec<Value>,
    pub total: usize,
}
