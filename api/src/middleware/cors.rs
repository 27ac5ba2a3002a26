//! CORS middleware configuration for cross-origin requests.
//!
//! The mobile app calls the endpoint directly, so CORS mostly matters for the
//! web build and local tooling. Development allows any origin; other
//! environments allow only the configured origins.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use mp_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-firebase-appcheck"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allow_any_origin {
        tracing::info!("Configuring permissive CORS");
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|s| s.trim()) {
            if !origin.is_empty() {
                tracing::info!(origin, "Adding allowed origin");
                cors = cors.allowed_origin(origin);
            }
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
