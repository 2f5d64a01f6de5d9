use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::keys;
use crate::page::{self, PageRequest};
use crate::project;
use crate::store::Store;

/// Canonical series shape. Field names mirror the attribute names the
/// scraper writes; every field is present-with-default on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Series {
    #[serde(rename = "_type")]
    pub provider: String,
    #[serde(rename = "_id")]
    pub series_id: String,
    #[serde(rename = "MangaTitle")]
    pub title: String,
    #[serde(rename = "MangaCover")]
    pub cover: String,
    #[serde(rename = "MangaUrl")]
    pub url: String,
    #[serde(rename = "MangaShortUrl")]
    pub short_url: String,
    #[serde(rename = "MangaSynopsis")]
    pub synopsis: String,
    #[serde(rename = "ScrapeDate")]
    pub scrape_date: String,
}

pub async fn fetch_all(store: &dyn Store, table: &str) -> Result<Vec<Series>, QueryError> {
    project::records(store.scan(table).await?)
}

pub async fn fetch_all_paginated(
    store: &dyn Store,
    table: &str,
    request: PageRequest,
) -> Result<Vec<Series>, QueryError> {
    project::records(page::nth_page(store, table, None, request).await?)
}

pub async fn fetch_by_provider(
    store: &dyn Store,
    provider: &str,
    table: &str,
) -> Result<Vec<Series>, QueryError> {
    let condition = keys::provider_condition(provider);
    project::records(store.query(table, &condition).await?)
}

pub async fn fetch_by_provider_paginated(
    store: &dyn Store,
    provider: &str,
    table: &str,
    request: PageRequest,
) -> Result<Vec<Series>, QueryError> {
    let condition = keys::provider_condition(provider);
    project::records(page::nth_page(store, table, Some(&condition), request).await?)
}

/// Point lookup. Absence is `None`, never an error.
pub async fn fetch_one(
    store: &dyn Store,
    provider: &str,
    series_id: &str,
    table: &str,
) -> Result<Option<Series>, QueryError> {
    let key = keys::series_key(provider, series_id);
    match store.get_item(table, &key).await? {
        Some(record) => Ok(Some(project::record(record)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert(
                "series",
                serde_json::json!({
                    "_type": "mangafast",
                    "_id": "one-piece",
                    "MangaTitle": "One Piece",
                    "MangaUrl": "https://example.com/one-piece",
                    "ScrapeDate": "2021-06-01",
                })
                .as_object()
                .unwrap()
                .clone(),
            )
            .unwrap();
        store
            .insert(
                "series",
                serde_json::json!({ "_type": "maid", "_id": "berserk" })
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .unwrap();
        store
    }

    #[tokio::test]
    async fn fetch_all_projects_every_row() {
        let store = seeded();
        let all = fetch_all(&store, "series").await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn fetch_by_provider_scopes_to_one_partition() {
        let store = seeded();
        let rows = fetch_by_provider(&store, "mangafast", "series").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "One Piece");
    }

    #[tokio::test]
    async fn unknown_provider_is_empty_success() {
        let store = seeded();
        let rows = fetch_by_provider(&store, "nothing", "series").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn missing_fields_project_to_defaults() {
        let store = seeded();
        let row = fetch_one(&store, "maid", "berserk", "series")
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(row.provider, "maid");
        assert_eq!(row.title, "");
        assert_eq!(row.synopsis, "");
        assert_eq!(row.scrape_date, "");
    }

    #[tokio::test]
    async fn fetch_one_absent_is_none() {
        let store = seeded();
        let row = fetch_one(&store, "mangafast", "naruto", "series")
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[test]
    fn serialized_shape_uses_scrape_time_names() {
        let series = Series {
            provider: "mangafast".to_string(),
            series_id: "one-piece".to_string(),
            ..Series::default()
        };
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["_type"], "mangafast");
        assert_eq!(value["_id"], "one-piece");
        assert_eq!(value["MangaTitle"], "");
    }
}
