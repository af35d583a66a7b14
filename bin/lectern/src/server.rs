//! JSON-over-HTTP transport for the search engine

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lectern_core::{CourseMeta, Lang};
use lectern_index::IndexStats;
use lectern_search::{
    BrowseRequest, CardsRequest, FacetCatalog, FilterOptions, Page, SearchEngine, SearchError,
    SearchRequest, SearchResultItem,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the API router.
pub fn create_router(engine: Arc<SearchEngine>) -> Router {
    Router::new()
        .route("/api/search", get(search_handler))
        .route("/api/cards", get(cards_handler))
        .route("/api/facets", get(facets_handler))
        .route("/api/tags", get(tags_handler))
        .route("/api/authors", get(authors_handler))
        .route("/api/domains", get(domains_handler))
        .route("/api/browse", get(browse_handler))
        .route("/api/refresh", post(refresh_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Transport error, mapped onto an HTTP status.
#[derive(Debug)]
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::Index(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Query string of `/api/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchParams {
    q: String,
    limit: Option<usize>,
    lang: Option<String>,
}

/// Query string of `/api/cards`; lists are comma-separated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CardsParams {
    q: String,
    limit: Option<usize>,
    lang: Option<String>,
    domains: Option<String>,
    authors: Option<String>,
    tags: Option<String>,
}

/// Query string of `/api/browse`; lists are comma-separated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BrowseParams {
    domains: Option<String>,
    authors: Option<String>,
    tags: Option<String>,
    lang: Option<String>,
    limit: Option<usize>,
    cursor: Option<i64>,
}

fn parse_lang(raw: Option<&str>) -> Result<Option<Lang>, SearchError> {
    match raw.map(str::trim).filter(|l| !l.is_empty()) {
        Some(code) => code.parse().map(Some).map_err(SearchError::invalid_request),
        None => Ok(None),
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

async fn search_handler(
    State(engine): State<Arc<SearchEngine>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<SearchResultItem>> {
    let request = SearchRequest {
        query: params.q,
        limit: params.limit,
        lang: parse_lang(params.lang.as_deref())?,
    };
    request.validate(engine.settings())?;
    Ok(Json(engine.search(&request).await?))
}

async fn cards_handler(
    State(engine): State<Arc<SearchEngine>>,
    Query(params): Query<CardsParams>,
) -> ApiResult<Vec<SearchResultItem>> {
    let request = CardsRequest {
        query: params.q,
        limit: params.limit,
        lang: parse_lang(params.lang.as_deref())?,
        domains: split_list(params.domains.as_deref()),
        authors: split_list(params.authors.as_deref()),
        tags: split_list(params.tags.as_deref()),
    };
    request.validate(engine.settings())?;
    Ok(Json(engine.cards(&request).await?))
}

async fn facets_handler(State(engine): State<Arc<SearchEngine>>) -> ApiResult<FacetCatalog> {
    Ok(Json(engine.facets().await?))
}

async fn tags_handler(State(engine): State<Arc<SearchEngine>>) -> ApiResult<Vec<String>> {
    Ok(Json(engine.tags().await?))
}

async fn authors_handler(State(engine): State<Arc<SearchEngine>>) -> ApiResult<Vec<String>> {
    Ok(Json(engine.authors().await?))
}

async fn domains_handler(State(engine): State<Arc<SearchEngine>>) -> ApiResult<Vec<String>> {
    Ok(Json(engine.domains().await?))
}

async fn browse_handler(
    State(engine): State<Arc<SearchEngine>>,
    Query(params): Query<BrowseParams>,
) -> ApiResult<Page<CourseMeta>> {
    let request = BrowseRequest {
        filter: FilterOptions {
            lang: parse_lang(params.lang.as_deref())?,
            domains: split_list(params.domains.as_deref()),
            authors: split_list(params.authors.as_deref()),
            tags: split_list(params.tags.as_deref()),
        },
        limit: params.limit,
        cursor: params.cursor,
    };
    request.validate(engine.settings())?;
    Ok(Json(engine.browse(&request).await?))
}

async fn refresh_handler(State(engine): State<Arc<SearchEngine>>) -> ApiResult<IndexStats> {
    Ok(Json(engine.refresh().await?))
}
