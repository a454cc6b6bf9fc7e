//! Core data structures for articles and journals
//!
//! Plain DTOs (`ArticleData`, `JournalData`) are built in memory by command
//! handlers. Stored records (`Article`, `Journal`, `GeneralTable`) carry the
//! store-owned primary key and TTL timestamp on top of the DTO fields.

use crate::core::schema::{FieldDef, Record, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds an article or journal survives after it was written
pub const DOCUMENT_TTL_SECS: u64 = 900;

/// Seconds a general table row survives after it was written
pub const GENERAL_TABLE_TTL_SECS: u64 = 3600;

/// Article contents, independent of any store identity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleData {
    pub journal_id: i64,
    pub title: String,
    pub authors: Vec<String>,
    pub employers: Vec<String>,
    pub keywords: Vec<String>,
    pub text: String,
    pub year: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JournalData {
    pub id: i64,
    pub title: String,
    pub articles: Vec<ArticleData>,
    pub year: i64,
    pub date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: i64,
    pub journal_id: i64,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub employers: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub text: String,
    pub year: i64,
    #[serde(rename = "uploaded_at")]
    pub uploaded: String,
    pub date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub articles: Vec<ArticleData>,
    pub year: i64,
    pub date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralTable {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub journals: Vec<JournalData>,
    pub description: String,
    pub date: i64,
}

impl Article {
    /// Build a record ready for insertion, stamped with the current time
    pub fn from_data(data: &ArticleData) -> Self {
        Self::from_data_at(data, Utc::now())
    }

    pub fn from_data_at(data: &ArticleData, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            journal_id: data.journal_id,
            title: data.title.clone(),
            authors: data.authors.clone(),
            employers: data.employers.clone(),
            keywords: data.keywords.clone(),
            text: data.text.clone(),
            year: data.year,
            uploaded: now.to_rfc3339(),
            date: now.timestamp(),
        }
    }

    /// The DTO view of this record, without store identity
    pub fn data(&self) -> ArticleData {
        ArticleData {
            journal_id: self.journal_id,
            title: self.title.clone(),
            authors: self.authors.clone(),
            employers: self.employers.clone(),
            keywords: self.keywords.clone(),
            text: self.text.clone(),
            year: self.year,
        }
    }
}

impl Journal {
    pub fn from_data(data: &JournalData) -> Self {
        Self::from_data_at(data, Utc::now())
    }

    /// The DTO's own id and timestamp are not carried over: the store assigns
    /// the key and the TTL clock starts at `now`.
    pub fn from_data_at(data: &JournalData, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            title: data.title.clone(),
            articles: data.articles.clone(),
            year: data.year,
            date: now.timestamp(),
        }
    }
}

impl GeneralTable {
    pub fn new(journals: &[JournalData], description: &str) -> Self {
        Self::new_at(journals, description, Utc::now())
    }

    pub fn new_at(journals: &[JournalData], description: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            journals: journals.to_vec(),
            description: description.to_string(),
            date: now.timestamp(),
        }
    }
}

impl Record for Article {
    const NAMESPACE: &'static str = "articles";

    fn schema() -> Schema {
        Schema::new()
            .field(FieldDef::int("id").primary_key())
            .field(FieldDef::int("journal_id"))
            .field(FieldDef::string("title"))
            .field(FieldDef::string("authors").array())
            .field(FieldDef::string("employers").array())
            .field(FieldDef::string("keywords").array())
            .field(FieldDef::string("text"))
            .field(FieldDef::int("year").sortable())
            .field(FieldDef::string("uploaded_at"))
            .field(FieldDef::int64("date").ttl(DOCUMENT_TTL_SECS))
    }
}

impl Record for Journal {
    const NAMESPACE: &'static str = "journals";

    fn schema() -> Schema {
        Schema::new()
            .field(FieldDef::int("id").primary_key())
            .field(FieldDef::string("title"))
            .field(FieldDef::embedded("articles"))
            .field(FieldDef::int("year").sortable())
            .field(FieldDef::int64("date").ttl(DOCUMENT_TTL_SECS))
    }
}

impl Record for GeneralTable {
    const NAMESPACE: &'static str = "generaltable";

    fn schema() -> Schema {
        Schema::new()
            .field(FieldDef::int64("id").primary_key())
            .field(FieldDef::embedded("journals"))
            .field(FieldDef::string("description"))
            .field(FieldDef::int64("date").ttl(GENERAL_TABLE_TTL_SECS))
    }
}
