//! Plain HTTP endpoints served next to the MCP endpoint in stream mode.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::engine::TieredAnswerEngine;
use crate::knowledge::Category;

#[derive(Debug, Deserialize)]
struct DataParams {
    categoria: Option<String>,
}

pub fn router(engine: Arc<TieredAnswerEngine>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/belem-data", get(belem_data))
        .route("/api/belem-data/", get(belem_data))
        .with_state(engine)
}

async fn health() -> &'static str {
    "OK"
}

/// Whole knowledge base, or `{"<key>": [...]}` with `?categoria=<key>`
async fn belem_data(
    State(engine): State<Arc<TieredAnswerEngine>>,
    Query(params): Query<DataParams>,
) -> Response {
    let Some(kb) = engine.knowledge().await else {
        return not_found("Base de dados não encontrada");
    };

    match params.categoria {
        None => Json(kb.as_ref()).into_response(),
        Some(key) => match key.parse::<Category>().ok().and_then(|c| kb.records(c)) {
            Some(records) => Json(json!({ key: records })).into_response(),
            None => not_found("Categoria não encontrada"),
        },
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}
