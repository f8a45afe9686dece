use axum::{Router, routing::post};

use crate::api::v1::handlers::login::login;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}
