use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::SearchResponse;
use crate::error::SearchError;
use crate::search::SearchService;

use super::models::{ErrorResponse, HealthResponse, SearchParams};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn search_handler(
    State(search_service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let start = Instant::now();

    let result = search_service
        .handle(params.q.as_deref(), params.limit.as_deref())
        .await;

    match result {
        Ok(response) => {
            log::info!(
                "search '{}' returned {} items in {}ms",
                response.query,
                response.count,
                start.elapsed().as_millis()
            );
            Ok(Json(response))
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                log::error!("search failed: {:#}", e);
            } else {
                log::warn!("search rejected: {:#}", e);
            }

            let query = params
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty());
            let agent_answer = match &e {
                SearchError::UpstreamError(_) | SearchError::ParseError(_) => {
                    format!("Failed to fetch products: {e}")
                }
                SearchError::MissingCredentials(_) => format!("Configuration error: {e}"),
                SearchError::InvalidRequest(_) => e.to_string(),
            };

            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                    kind: e.kind().to_string(),
                    query,
                    count: 0,
                    items: Vec::new(),
                    agent_answer,
                }),
            ))
        }
    }
}

/// Missing credentials map to 400, matching the published API contract.
pub fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::InvalidRequest(_) | SearchError::MissingCredentials(_) => {
            StatusCode::BAD_REQUEST
        }
        SearchError::UpstreamError(_) | SearchError::ParseError(_) => StatusCode::BAD_GATEWAY,
    }
}
