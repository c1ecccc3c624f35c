use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Environment;
use crate::handlers::{protected, public};
use crate::middleware::{require_admin, session_middleware};
use crate::state::AppState;

/// Full application router. The session layer runs for every request; the
/// admin gate wraps only dividend mutations.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(dividend_routes())
        .merge(admin_dividend_routes())
        // Global middleware
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(public::auth::register))
        .route("/api/login", post(public::auth::login))
        .route("/api/logout", post(public::auth::logout))
        .route("/api/user", get(protected::auth::whoami))
}

fn dividend_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dividends", get(public::dividends::list))
        .route("/api/dividends/:id", get(public::dividends::get))
}

fn admin_dividend_routes() -> Router<AppState> {
    use axum::routing::patch;
    use protected::dividends;

    Router::new()
        .route("/api/dividends", post(dividends::create))
        .route(
            "/api/dividends/:id",
            patch(dividends::patch).delete(dividends::delete),
        )
        .route("/api/dividends/:id/year", post(dividends::append_year))
        .route_layer(from_fn(require_admin))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let security = &state.config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if state.config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Dividend Catalog API",
        "version": version,
        "endpoints": {
            "dividends": "/api/dividends[/:id] (public read, admin write)",
            "year": "/api/dividends/:id/year (admin)",
            "auth": "/api/register, /api/login, /api/logout, /api/user",
            "health": "/health"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "store": "memory"
    }))
}
