use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use mp_api::app::create_app;
use mp_api::routes::verification::AppState;
use mp_api::telemetry::init_tracing;
use mp_core::services::{VerificationCodeIssuer, VerificationIssuerConfig};
use mp_infra::mail::create_mail_transport;
use mp_infra::store::create_document_store;
use mp_shared::config::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific .env first, then the generic one
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        mail_provider = config.mail.provider.as_str(),
        store_provider = config.store.provider.as_str(),
        "Starting Ma Plante API Server"
    );

    let mail_transport = create_mail_transport(&config).context("Failed to create mail transport")?;
    let document_store = create_document_store(&config.store)
        .await
        .context("Failed to create document store")?;

    let issuer = Arc::new(VerificationCodeIssuer::new(
        Arc::new(mail_transport),
        Arc::new(document_store),
        VerificationIssuerConfig::new(&config.mail, &config.store),
    ));
    let app_state = web::Data::new(AppState { issuer });

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(app_state.clone(), &app_config))
        .keep_alive(config.server.keep_alive_duration());
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
