use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::keys;
use crate::page::{self, PageRequest};
use crate::project;
use crate::store::Store;

/// Canonical chapter shape. The `_type` attribute carries the concatenated
/// `provider_seriesId` partition; `content` keeps scrape-time order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapters {
    #[serde(rename = "_type")]
    pub partition: String,
    #[serde(rename = "_id")]
    pub chapters_id: String,
    #[serde(rename = "ChapterTitle")]
    pub title: String,
    #[serde(rename = "ChapterNumber")]
    pub number: String,
    #[serde(rename = "ChapterDate")]
    pub date: String,
    #[serde(rename = "ChapterUrl")]
    pub url: String,
    #[serde(rename = "ChapterShortUrl")]
    pub short_url: String,
    #[serde(rename = "ChapterOrder")]
    pub order: i64,
    #[serde(rename = "ChapterPrevSlug")]
    pub prev_slug: String,
    #[serde(rename = "ChapterNextSlug")]
    pub next_slug: String,
    #[serde(rename = "ChapterContent")]
    pub content: Vec<String>,
    #[serde(rename = "ScrapeDate")]
    pub scrape_date: String,
}

pub async fn fetch_by_series(
    store: &dyn Store,
    provider: &str,
    series_id: &str,
    table: &str,
) -> Result<Vec<Chapters>, QueryError> {
    let condition = keys::series_chapter_condition(provider, series_id);
    project::records(store.query(table, &condition).await?)
}

pub async fn fetch_by_series_paginated(
    store: &dyn Store,
    provider: &str,
    series_id: &str,
    table: &str,
    request: PageRequest,
) -> Result<Vec<Chapters>, QueryError> {
    let condition = keys::series_chapter_condition(provider, series_id);
    project::records(page::nth_page(store, table, Some(&condition), request).await?)
}

/// Point lookup. Absence is `None`, never an error.
pub async fn fetch_one(
    store: &dyn Store,
    provider: &str,
    series_id: &str,
    chapters_id: &str,
    table: &str,
) -> Result<Option<Chapters>, QueryError> {
    let key = keys::chapter_key(provider, series_id, chapters_id);
    match store.get_item(table, &key).await? {
        Some(record) => Ok(Some(project::record(record)?)),
        None => Ok(None),
    }
}
