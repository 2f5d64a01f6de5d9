use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;

/// Key attribute names shared by both tables, as written by the scraper.
pub const PARTITION_ATTR: &str = "_type";
pub const SORT_ATTR: &str = "_id";

/// A raw store record: an unordered bag of JSON fields.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Exact composite key for a point lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub partition: String,
    pub sort: String,
}

/// Equality condition on a named key attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    attribute: String,
    value: String,
}

impl KeyCondition {
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Opaque continuation token issued by the store after a bounded fetch.
/// Only valid for the walk that produced it; never leaves the process.
#[derive(Debug, Clone)]
pub struct PageCursor {
    last_partition: String,
    last_sort: String,
}

/// One bounded batch plus the cursor for the next one (`None` = last page).
#[derive(Debug)]
pub struct FetchedPage {
    pub items: Vec<RawRecord>,
    pub next: Option<PageCursor>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("key condition on '{attribute}' does not match the table partition key")]
    Condition { attribute: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only store client. Implementations must be safe to share across
/// concurrent request invocations.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<RawRecord>, StoreError>;

    async fn query(
        &self,
        table: &str,
        condition: &KeyCondition,
    ) -> Result<Vec<RawRecord>, StoreError>;

    async fn query_page(
        &self,
        table: &str,
        condition: &KeyCondition,
        limit: u64,
        start: Option<PageCursor>,
    ) -> Result<FetchedPage, StoreError>;

    async fn scan(&self, table: &str) -> Result<Vec<RawRecord>, StoreError>;

    async fn scan_page(
        &self,
        table: &str,
        limit: u64,
        start: Option<PageCursor>,
    ) -> Result<FetchedPage, StoreError>;
}

type Table = BTreeMap<(String, String), RawRecord>;

/// In-memory store over scraper snapshot files. Tables are ordered by
/// `(partition, sort)`, which is also the order queries and scans yield.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&mut self, name: impl Into<String>) {
        self.tables.entry(name.into()).or_default();
    }

    pub fn insert(&mut self, table: &str, record: RawRecord) -> anyhow::Result<()> {
        let partition = key_attr(&record, PARTITION_ATTR)?;
        let sort = key_attr(&record, SORT_ATTR)?;
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert((partition, sort), record);
        Ok(())
    }

    /// Loads one table from a JSON array of raw records, creating the table
    /// if it does not exist yet. Returns the number of records loaded.
    pub fn load_snapshot(&mut self, table: &str, path: &Path) -> anyhow::Result<usize> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read snapshot: {}", path.display()))?;
        let records: Vec<RawRecord> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse snapshot: {}", path.display()))?;

        let count = records.len();
        self.create_table(table);
        for record in records {
            self.insert(table, record)
                .with_context(|| format!("load snapshot: {}", path.display()))?;
        }
        Ok(count)
    }

    fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }
}

fn key_attr(record: &RawRecord, attr: &str) -> anyhow::Result<String> {
    match record.get(attr) {
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        Some(_) => anyhow::bail!("record key attribute '{attr}' must be a string"),
        None => anyhow::bail!("record is missing key attribute '{attr}'"),
    }
}

fn check_condition(condition: &KeyCondition) -> Result<(), StoreError> {
    if condition.attribute() != PARTITION_ATTR {
        return Err(StoreError::Condition {
            attribute: condition.attribute().to_string(),
        });
    }
    Ok(())
}

/// Takes up to `limit` rows off an ordered iterator and issues a cursor if
/// at least one more row follows.
fn bounded<'a>(
    rows: impl Iterator<Item = (&'a (String, String), &'a RawRecord)>,
    limit: u64,
) -> FetchedPage {
    let mut items = Vec::new();
    let mut last_key: Option<&(String, String)> = None;
    let mut more = false;

    for (key, record) in rows {
        if items.len() as u64 >= limit {
            more = true;
            break;
        }
        items.push(record.clone());
        last_key = Some(key);
    }

    let next = if more {
        last_key.map(|(partition, sort)| PageCursor {
            last_partition: partition.clone(),
            last_sort: sort.clone(),
        })
    } else {
        None
    };

    FetchedPage { items, next }
}

fn resume_bound(start: Option<PageCursor>, first: Bound<(String, String)>) -> Bound<(String, String)> {
    match start {
        Some(cursor) => Bound::Excluded((cursor.last_partition, cursor.last_sort)),
        None => first,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<RawRecord>, StoreError> {
        let table = self.table(table)?;
        Ok(table
            .get(&(key.partition.clone(), key.sort.clone()))
            .cloned())
    }

    async fn query(
        &self,
        table: &str,
        condition: &KeyCondition,
    ) -> Result<Vec<RawRecord>, StoreError> {
        check_condition(condition)?;
        let table = self.table(table)?;
        Ok(table
            .range((condition.value().to_string(), String::new())..)
            .take_while(|((partition, _), _)| partition == condition.value())
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn query_page(
        &self,
        table: &str,
        condition: &KeyCondition,
        limit: u64,
        start: Option<PageCursor>,
    ) -> Result<FetchedPage, StoreError> {
        check_condition(condition)?;
        let table = self.table(table)?;
        let lower = resume_bound(
            start,
            Bound::Included((condition.value().to_string(), String::new())),
        );
        let rows = table
            .range((lower, Bound::Unbounded))
            .take_while(|((partition, _), _)| partition == condition.value());
        Ok(bounded(rows, limit))
    }

    async fn scan(&self, table: &str) -> Result<Vec<RawRecord>, StoreError> {
        let table = self.table(table)?;
        Ok(table.values().cloned().collect())
    }

    async fn scan_page(
        &self,
        table: &str,
        limit: u64,
        start: Option<PageCursor>,
    ) -> Result<FetchedPage, StoreError> {
        let table = self.table(table)?;
        let lower = resume_bound(start, Bound::Unbounded);
        let rows = table.range((lower, Bound::Unbounded));
        Ok(bounded(rows, limit))
    }
}
