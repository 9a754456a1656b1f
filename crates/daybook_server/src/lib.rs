//! HTTP binding for the Daybook event core.
//!
//! Routing only maps verbs and paths onto `EventService`; every rule lives
//! in `daybook_core`.

pub mod config;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use config::ServerConfig;
pub use state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Builds the full application router.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let cors = cors_layer(allowed_origins)?;

    Ok(Router::new()
        .merge(routes::health::router())
        .merge(routes::events::router())
        .with_state(state)
        .layer(cors))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin `{origin}`"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}
