/*
 * Responsibility
 * - GET /health (疎通用、guard なし)
 * - DB には触れない (liveness のみ)
 */
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
