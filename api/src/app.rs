//! Application factory
//!
//! Builds the Actix-web application around a shared verification code
//! issuer. Collaborator types stay generic so tests can plug in mocks.

use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse};

use mp_core::services::{CheckOutcome, DocumentStoreTrait, MailTransportTrait};
use mp_shared::{AppConfig, HealthResponse, ServiceHealth};

use crate::handlers::{extract_language, json_error_handler};
use crate::i18n;
use crate::middleware::{
    cors::create_cors,
    security::{SecurityMiddleware, HEALTH_PATH},
};
use crate::routes::verification::{send_verification_code, AppState};

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "ma-plante-api";

/// Create and configure the application with all dependencies
pub fn create_app<M, D>(
    app_state: web::Data<AppState<M, D>>,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    M: MailTransportTrait + 'static,
    D: DocumentStoreTrait + 'static,
{
    let cors = create_cors(&config.cors);
    let security = SecurityMiddleware::from_config(&config.server, config.environment);
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Order matters: security first, then CORS, then logging
        .wrap(Logger::default())
        .wrap(cors)
        .wrap(security)
        .route(HEALTH_PATH, web::get().to(health_check::<M, D>))
        .route("/sendVerificationCode", web::post().to(send_verification_code::<M, D>))
        .route("/", web::get().to(api_documentation))
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler.
///
/// Checks both collaborators and answers 503 when either is unreachable.
async fn health_check<M, D>(state: web::Data<AppState<M, D>>) -> HttpResponse
where
    M: MailTransportTrait + 'static,
    D: DocumentStoreTrait + 'static,
{
    let health = state.issuer.check_health().await;
    let response = HealthResponse::new(SERVICE_NAME, env!("CARGO_PKG_VERSION"))
        .with_check("mail", service_health(&health.mail))
        .with_check("store", service_health(&health.store));

    if response.is_healthy() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

fn service_health(outcome: &CheckOutcome) -> ServiceHealth {
    let elapsed_ms = outcome.elapsed.as_millis() as u64;
    match &outcome.error {
        None => ServiceHealth::healthy(outcome.provider.as_str(), elapsed_ms),
        Some(error) => ServiceHealth::unhealthy(outcome.provider.as_str(), error.as_str(), elapsed_ms),
    }
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Ma Plante API",
        "endpoints": {
            "health": "/health",
            "send_verification_code": {
                "path": "/sendVerificationCode",
                "method": "POST",
                "description": "Email a verification code and record it for the address",
                "request_body": {
                    "data": {
                        "email": "string (non-empty)",
                        "code": "string (non-empty)"
                    }
                },
                "responses": {
                    "200": { "result": { "success": true } },
                    "500": { "error": { "status": "INTERNAL", "message": "string" } }
                }
            }
        }
    }))
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    let message = i18n::get_message("not_found", extract_language(&req)).unwrap_or("Not found");
    HttpResponse::NotFound().json(serde_json::json!({
        "error": {
            "status": "NOT_FOUND",
            "message": message
        }
    }))
}
