use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    core::PopularQuery,
    http::{AppState, ResultIntoApiError, api_error::ApiError},
    models::{Identity, SearchRequest, SearchResults},
    types::{HandlerResult, JournalId},
};

const DEFAULT_POPULAR_LIMIT: usize = 10;
const MAX_POPULAR_LIMIT: usize = 100;

/// Raw query string, validated by [`SearchRequest::from_params`]
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    operator: Option<String>,
    #[serde(rename = "type")]
    type_filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PopularParams {
    limit: Option<usize>,
}

async fn search(
    state: &AppState,
    identity: Identity,
    journal_id: Option<JournalId>,
    params: SearchParams,
) -> HandlerResult<Json<SearchResults>> {
    let request = SearchRequest::from_params(
        identity,
        journal_id,
        params.query.as_deref(),
        params.operator.as_deref(),
        params.type_filter.as_deref(),
    )
    .api_err()?;

    let results = state.orchestrator.execute(&request).await.api_err()?;
    Ok(Json(results))
}

/// `GET /search`
pub async fn search_all(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<SearchParams>,
) -> HandlerResult<Json<SearchResults>> {
    search(&state, identity, None, params).await
}

/// `GET /search/{journal_id}`
pub async fn search_journal(
    State(state): State<AppState>,
    identity: Identity,
    Path(journal_id): Path<JournalId>,
    Query(params): Query<SearchParams>,
) -> HandlerResult<Json<SearchResults>> {
    search(&state, identity, Some(journal_id), params).await
}

/// `GET /search/popular`
pub async fn popular_queries(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> HandlerResult<Json<Vec<PopularQuery>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_POPULAR_LIMIT)
        .min(MAX_POPULAR_LIMIT);

    let queries = state
        .orchestrator
        .popularity()
        .top(limit)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(queries))
}
