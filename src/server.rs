use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::chapters;
use crate::error::QueryError;
use crate::page::PageRequest;
use crate::series;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub series_table: String,
    pub chapters_table: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/series", get(get_series))
        .route("/series/:series_id", get(get_series_by_id))
        .route("/chapters", get(get_chapters))
        .route("/chapters/:chapters_id", get(get_chapters_by_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    provider: Option<String>,
    #[serde(rename = "seriesId")]
    series_id: Option<String>,
    limit: Option<String>,
    page: Option<String>,
}

impl ListParams {
    /// `limit` present means the paginated operation family; absent means
    /// the unpaginated one. A `page` without `limit` is ignored.
    fn page_request(&self) -> Result<Option<PageRequest>, QueryError> {
        match &self.limit {
            Some(limit) => PageRequest::from_params(limit, self.page.as_deref()).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn failure(err: &QueryError) -> Response {
    let status = match err {
        QueryError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        QueryError::QueryBuild(_) | QueryError::Fetch(_) | QueryError::Unmarshal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        tracing::warn!(error = %err, "query failed");
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn missing(parameter: &str) -> Response {
    failure(&QueryError::InvalidParameter(format!(
        "invalid {parameter} value"
    )))
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("{what} not found"),
        }),
    )
        .into_response()
}

async fn get_series(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let page = match params.page_request() {
        Ok(page) => page,
        Err(err) => return failure(&err),
    };

    let store = state.store.as_ref();
    let table = &state.series_table;
    let result = match (params.provider.as_deref(), page) {
        (Some(provider), Some(request)) => {
            series::fetch_by_provider_paginated(store, provider, table, request).await
        }
        (Some(provider), None) => series::fetch_by_provider(store, provider, table).await,
        (None, Some(request)) => series::fetch_all_paginated(store, table, request).await,
        (None, None) => series::fetch_all(store, table).await,
    };

    match result {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => failure(&err),
    }
}

async fn get_series_by_id(
    State(state): State<AppState>,
    Path(series_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let Some(provider) = params.provider.as_deref() else {
        return missing("provider");
    };

    let result = series::fetch_one(
        state.store.as_ref(),
        provider,
        &series_id,
        &state.series_table,
    )
    .await;

    match result {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => not_found("series"),
        Err(err) => failure(&err),
    }
}

async fn get_chapters(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let Some(provider) = params.provider.as_deref() else {
        return missing("provider");
    };
    let Some(series_id) = params.series_id.as_deref() else {
        return missing("seriesId");
    };
    let page = match params.page_request() {
        Ok(page) => page,
        Err(err) => return failure(&err),
    };

    let store = state.store.as_ref();
    let table = &state.chapters_table;
    let result = match page {
        Some(request) => {
            chapters::fetch_by_series_paginated(store, provider, series_id, table, request).await
        }
        None => chapters::fetch_by_series(store, provider, series_id, table).await,
    };

    match result {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => failure(&err),
    }
}

async fn get_chapters_by_id(
    State(state): State<AppState>,
    Path(chapters_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let Some(provider) = params.provider.as_deref() else {
        return missing("provider");
    };
    let Some(series_id) = params.series_id.as_deref() else {
        return missing("seriesId");
    };

    let result = chapters::fetch_one(
        state.store.as_ref(),
        provider,
        series_id,
        &chapters_id,
        &state.chapters_table,
    )
    .await;

    match result {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => not_found("chapters"),
        Err(err) => failure(&err),
    }
}
