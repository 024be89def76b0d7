//! Accounts is a small account registry: validated creation and read-back
//! of accounts stored in a document store.

#![forbid(unsafe_code)]
pub mod account;
pub mod adapters;
pub mod config;
pub mod database;
pub mod error;
pub mod ports;
mod router;
pub mod telemetry;
pub mod usecases;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, header};
use axum::routing::get;
use axum::{Router, middleware as AxumMiddleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};

use adapters::clock::{SystemClock, UuidGenerator};
use adapters::dispatcher::InProcessDispatcher;
use adapters::memory::MemoryDocumentStore;
use adapters::postgres::PgDocumentStore;
use adapters::telemetry::TracingTelemetry;
use config::{ConfigError, Configuration};
use ports::{CreateAccount, DocumentCatalog, DocumentStore, QueryDispatcher};
use usecases::{CreateAccountUseCase, GetAccountHandler, ListAccountsHandler};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// In-memory state with default configuration.
#[cfg(test)]
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(Configuration::default()),
        Arc::new(MemoryDocumentStore::new()),
    )
    .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub create_account: Arc<dyn CreateAccount>,
    pub dispatcher: Arc<dyn QueryDispatcher>,
    pub metrics: Option<PrometheusHandle>,
    /// Cancelled on shutdown; every request works on a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire use cases and read side on top of `store`.
    pub fn new<S>(config: Arc<Configuration>, store: Arc<S>) -> Result<Self, ConfigError>
    where
        S: DocumentStore + DocumentCatalog + 'static,
    {
        let dispatcher: Arc<dyn QueryDispatcher> = Arc::new(InProcessDispatcher::new(
            ListAccountsHandler::new(store.clone()),
            GetAccountHandler::new(store.clone()),
        ));

        let create_account = Arc::new(CreateAccountUseCase::new(
            store,
            Arc::clone(&dispatcher),
            config.validation.validator()?,
            Arc::new(UuidGenerator),
            Arc::new(SystemClock),
            Arc::new(TracingTelemetry::new()),
            config.workflow,
        ));

        Ok(Self {
            config,
            create_account,
            dispatcher,
            metrics: None,
            shutdown: CancellationToken::new(),
        })
    }

    /// Expose Prometheus metrics on `GET /metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        // Remove senstive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `GET /metrics` goes to `metrics`.
        .route("/metrics", get(router::status::metrics))
        .merge(router::accounts::router())
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
///
/// PostgreSQL is used when configured, the in-memory store otherwise.
pub async fn initialize_state(
    config: Arc<Configuration>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let state = match config.postgres {
        Some(ref postgres) => {
            let db = database::Database::from_config(postgres).await?;
            // execute migrations scripts on start.
            db.migrate().await?;

            AppState::new(Arc::clone(&config), Arc::new(PgDocumentStore::new(db.postgres)))?
        },
        None => {
            tracing::warn!("missing `postgres` entry on `config.yaml` file, accounts are kept in memory");

            AppState::new(Arc::clone(&config), Arc::new(MemoryDocumentStore::new()))?
        },
    };

    Ok(state)
}
