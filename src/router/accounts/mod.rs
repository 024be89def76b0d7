//! Accounts-related HTTP API.
mod create;
mod get;
mod list;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST /accounts` goes to `create`, `GET /accounts` to `list`.
        .route("/accounts", post(create::handler).get(list::handler))
        // `GET /accounts/{id}` reads an account back.
        .route("/accounts/{account_id}", get(get::handler))
}
