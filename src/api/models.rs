use serde::{Deserialize, Serialize};

use crate::data_models::Product;

/// Query string of `GET /api/search`. Both values stay raw strings so that
/// validation errors come from the search service rather than axum rejections.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub query: Option<String>,
    pub count: usize,
    pub items: Vec<Product>,
    pub agent_answer: String,
}
