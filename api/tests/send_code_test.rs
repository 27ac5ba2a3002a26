//! Integration tests for the callable sendVerificationCode endpoint

use actix_web::{http::header, http::StatusCode, test, web};
use serde_json::{json, Value};
use std::sync::Arc;

use mp_api::app::create_app;
use mp_api::routes::verification::AppState;
use mp_core::domain::entities::VerificationRecord;
use mp_core::services::{DocumentStoreTrait, VerificationCodeIssuer, VerificationIssuerConfig};
use mp_infra::mail::MockMailTransport;
use mp_infra::store::MemoryDocumentStore;
use mp_shared::config::{AppConfig, Environment};

struct TestContext {
    mail: Arc<MockMailTransport>,
    store: Arc<MemoryDocumentStore>,
    state: web::Data<AppState<MockMailTransport, MemoryDocumentStore>>,
    config: AppConfig,
}

fn context(mail: MockMailTransport) -> TestContext {
    let mail = Arc::new(mail);
    let store = Arc::new(MemoryDocumentStore::new());
    let issuer = Arc::new(VerificationCodeIssuer::new(
        mail.clone(),
        store.clone(),
        VerificationIssuerConfig::default(),
    ));

    TestContext {
        mail,
        store,
        state: web::Data::new(AppState { issuer }),
        config: AppConfig::for_environment(Environment::Development),
    }
}

fn call(payload: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/sendVerificationCode")
        .set_json(payload)
}

#[actix_rt::test]
async fn test_send_code_success() {
    let ctx = context(MockMailTransport::new());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = call(json!({ "data": { "email": "user@example.com", "code": "482913" } })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "result": { "success": true } }));

    let sent = ctx.mail.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "user@example.com");
    assert!(sent[0].text.contains("482913"));

    let stored = ctx
        .store
        .get("verification_codes", "user@example.com")
        .await
        .unwrap()
        .expect("record should be stored");
    let record = VerificationRecord::from_stored("user@example.com", &stored).unwrap();
    assert_eq!(record.code, "482913");
}

#[actix_rt::test]
async fn test_second_code_replaces_first() {
    let ctx = context(MockMailTransport::new());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    for code in ["c1", "c2"] {
        let req = call(json!({ "data": { "email": "user@example.com", "code": code } })).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    assert_eq!(ctx.store.count("verification_codes"), 1);
    let stored = ctx.store.get("verification_codes", "user@example.com").await.unwrap().unwrap();
    assert_eq!(stored.get("code").and_then(|v| v.as_str()), Some("c2"));
}

#[actix_rt::test]
async fn test_mail_failure_returns_internal() {
    let ctx = context(MockMailTransport::failing());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = call(json!({ "data": { "email": "user@example.com", "code": "482913" } })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "error": { "status": "INTERNAL", "message": "Erreur lors de l'envoi du code" } })
    );

    assert_eq!(ctx.store.count("verification_codes"), 0);
}

#[actix_rt::test]
async fn test_error_message_in_english() {
    let ctx = context(MockMailTransport::failing());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = call(json!({ "data": { "email": "user@example.com", "code": "482913" } }))
        .insert_header((header::ACCEPT_LANGUAGE, "en-US,en;q=0.8"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["status"], "INTERNAL");
    assert_eq!(body["error"]["message"], "Error while sending the code");
}

#[actix_rt::test]
async fn test_malformed_payloads_return_internal() {
    let ctx = context(MockMailTransport::new());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let payloads = [
        json!({ "email": "user@example.com", "code": "482913" }),
        json!({ "data": { "email": "user@example.com" } }),
        json!({ "data": { "email": "", "code": "482913" } }),
        json!({ "data": { "email": "user@example.com", "code": "" } }),
        json!({ "data": { "email": 42, "code": "482913" } }),
    ];

    for payload in payloads {
        let resp = test::call_service(&app, call(payload.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "payload: {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["status"], "INTERNAL", "payload: {}", payload);
    }

    let req = test::TestRequest::post()
        .uri("/sendVerificationCode")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(ctx.mail.message_count(), 0);
    assert_eq!(ctx.store.count("verification_codes"), 0);
}

#[actix_rt::test]
async fn test_request_id_echoed() {
    let ctx = context(MockMailTransport::new());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = call(json!({ "data": { "email": "user@example.com", "code": "482913" } }))
        .insert_header(("x-request-id", "req-1234"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-1234");
}

#[actix_rt::test]
async fn test_health_check() {
    let ctx = context(MockMailTransport::new());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ma-plante-api");
    assert_eq!(body["checks"]["mail"]["provider"], "mock");
    assert_eq!(body["checks"]["mail"]["status"], "healthy");
    assert_eq!(body["checks"]["store"]["provider"], "memory");
    assert_eq!(body["checks"]["store"]["status"], "healthy");
}

#[actix_rt::test]
async fn test_health_check_reports_unreachable_mail() {
    let ctx = context(MockMailTransport::failing());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["mail"]["status"], "unhealthy");
    assert!(body["checks"]["mail"]["message"].as_str().unwrap().contains("outage"));
    assert_eq!(body["checks"]["store"]["status"], "healthy");
}

#[actix_rt::test]
async fn test_unknown_route_is_not_found() {
    let ctx = context(MockMailTransport::new());
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/verifyCode").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["status"], "NOT_FOUND");
}
