//! Create an account.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::Json;

use crate::AppState;
use crate::account::{AccountViewModel, CreateAccountRequest};
use crate::error::Result;

/// Handler to create an account.
pub async fn handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<AccountViewModel>)> {
    let Json(request) = payload?;

    let view = state
        .create_account
        .execute(request, state.shutdown.child_token())
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/accounts/{}", view.account.id))],
        Json(view),
    ))
}
