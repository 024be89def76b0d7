//! List accounts through the read side.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::AppState;
use crate::account::Account;
use crate::error::{Result, ServerError};
use crate::ports::{AccountQuery, QueryResponse};

/// Pagination parameters.
#[derive(Debug, Default, Deserialize)]
pub struct Params {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<Params>, QueryRejection>,
) -> Result<Json<Vec<Account>>> {
    let Query(params) = params?;
    let query = AccountQuery::list(params.limit, params.offset);

    match state.dispatcher.send(query).await? {
        QueryResponse::Accounts(accounts) => Ok(Json(accounts)),
        other => Err(ServerError::Internal {
            details: format!("unexpected response to list query: {other:?}"),
            source: None,
        }),
    }
}
