//! Error handler for the HTTP layer.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::account::{FieldError, field_errors};
use crate::usecases::error::ApplicationError;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("`{0}` is not a valid account id")]
    InvalidId(String),

    #[error(transparent)]
    Application(ApplicationError),

    #[error("internal server error, {details}")]
    Internal {
        details: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<ApplicationError> for ServerError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::ValidationFailed(errors) => Self::Validation(errors),
            err => Self::Application(err),
        }
    }
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Update `instance` field.
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(field_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/problem+json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .title("There were validation errors with your request.")
            .details(&self.to_string())
            .status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => response.errors(validation_errors),

            ServerError::Axum(rejection) => response
                .title("Malformed request body.")
                .details(&rejection.body_text())
                .status(rejection.status()),

            ServerError::Query(rejection) => response
                .title("Malformed query string.")
                .details(&rejection.body_text())
                .status(rejection.status()),

            ServerError::InvalidId(_) => response
                .title("Account not found.")
                .status(StatusCode::NOT_FOUND),

            ServerError::Application(ApplicationError::NotFound { entity, id }) => response
                .title(&format!("{entity} not found."))
                .instance(format!("/accounts/{id}"))
                .status(StatusCode::NOT_FOUND),

            ServerError::Application(ApplicationError::Cancelled) => response
                .title("Request cancelled before completion.")
                .status(StatusCode::SERVICE_UNAVAILABLE),

            ServerError::Application(err @ ApplicationError::CreateFailed { entity, id, .. }) => {
                tracing::error!(error = %err, entity, account_id = %id, "server returned 500 status");

                ResponseError::default()
                    .title("Account could not be created.")
                    .details(&err.to_string())
            },

            ServerError::Application(err) => {
                tracing::error!(error = %err, "server returned 500 status");

                ResponseError::default()
            },

            ServerError::Internal { details, source } => {
                tracing::error!(err = ?source, %details, "server returned 500 status");

                ResponseError::default()
            },
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/problem+json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StoreError;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body(err: ServerError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_failed_is_500_with_id() {
        let err = ApplicationError::CreateFailed {
            entity: "AccountDocument",
            id: "0b3c5a2e-6a8f-4d0b-9c1e-1f2a3b4c5d6e".into(),
            status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            source: None,
        };

        let (status, body) = body(err.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .contains("0b3c5a2e-6a8f-4d0b-9c1e-1f2a3b4c5d6e")
        );
    }

    #[tokio::test]
    async fn test_store_error_hides_details() {
        let err = ApplicationError::Store(StoreError::Unavailable("secret host".into()));

        let (status, body) = body(err.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "");
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            validator::ValidationError::new("blank").with_message("Name must not be empty.".into()),
        );

        let (status, body) = body(ApplicationError::ValidationFailed(errors).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["errors"][0]["message"], "Name must not be empty.");
    }

    #[tokio::test]
    async fn test_cancelled_maps_to_503() {
        let (status, _) = body(ApplicationError::Cancelled.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
