use axum::{Router, extract::FromRef, http::HeaderName};

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::{Key, time::Duration},
    service::SignedCookie,
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod views;

// Module for routing segregation (Public, Curation).
pub mod routes;
use config::Env;
use routes::{curation, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers and extractors to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

// Sessions idle for this long are discarded by the store.
const SESSION_TTL_DAYS: i64 = 30;

/// session_layer
///
/// Builds the tower-sessions layer over the given store: signed cookie keyed
/// from the configured secret, 30-day inactivity expiry, and the Secure cookie
/// attribute only outside local development (local runs plain HTTP).
pub fn session_layer<Store: SessionStore>(
    store: Store,
    config: &AppConfig,
) -> SessionManagerLayer<Store, SignedCookie> {
    let key = Key::from(config.session_secret.as_bytes());
    SessionManagerLayer::new(store)
        .with_secure(config.env == Env::Production)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_TTL_DAYS)))
        .with_signed(key)
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state. The session layer is
/// a parameter so tests can run over an in-memory store while production wires
/// the Postgres-backed one.
pub fn create_router<Store>(
    state: AppState,
    sessions: SessionManagerLayer<Store, SignedCookie>,
) -> Router
where
    Store: SessionStore + Clone,
{
    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Base Router Assembly
    let base_router = Router::new()
        // Public Routes: listings, search, session transitions.
        .merge(public::public_routes())
        // Curation Routes: the admin gate is consulted inside each handler,
        // because the refusal differs by route shape (redirect vs 403).
        .merge(curation::curation_routes())
        // Session Layer: materializes the per-visitor session for every route.
        .layer(sessions)
        // Apply the Unified State to all routes.
        .with_state(state);

    // 2. Observability and Correlation Layers (Applied outermost/first)
    base_router.layer(
        ServiceBuilder::new()
            // 2a. Request ID Generation: a unique UUID for every incoming request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 2b. Request Tracing: wraps the request/response lifecycle in a
            // tracing span correlated by the generated request ID.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 2c. Request ID Propagation: returns the x-request-id header to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI, so every log
/// line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
