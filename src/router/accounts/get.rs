//! Read an account back.

use axum::Json;
use axum::extract::{Path, State};

use crate::account::{AccountId, AccountViewModel};
use crate::error::{Result, ServerError};
use crate::ports::{AccountQuery, QueryResponse};
use crate::AppState;

pub async fn handler(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountViewModel>> {
    let id = AccountId::parse(&account_id).map_err(|_| ServerError::InvalidId(account_id))?;

    match state.dispatcher.send(AccountQuery::Get { id }).await? {
        QueryResponse::Account(account) => Ok(Json(AccountViewModel::new(account))),
        other => Err(ServerError::Internal {
            details: format!("unexpected response to account query: {other:?}"),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::account::AccountViewModel;
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_back() {
        let state = test_state();

        let response = make_request(
            app(state.clone()),
            Method::POST,
            "/accounts",
            json!({ "name": "Acme Corp" }).to_string(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let created: AccountViewModel = serde_json::from_slice(&body).unwrap();

        let response = make_request(
            app(state),
            Method::GET,
            &format!("/accounts/{}", created.account.id),
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let read: AccountViewModel = serde_json::from_slice(&body).unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let response = make_request(
            app(test_state()),
            Method::GET,
            "/accounts/0b3c5a2e-6a8f-4d0b-9c1e-1f2a3b4c5d6e",
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_account_id() {
        let response = make_request(
            app(test_state()),
            Method::GET,
            "/accounts/acme",
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
