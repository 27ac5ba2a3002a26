use actix_web::{http::header, web, HttpRequest, HttpResponse, ResponseError};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

use mp_core::services::{DocumentStoreTrait, MailTransportTrait, VerificationCodeIssuer};
use mp_shared::{mask_email, CallableRequest, CallableResult};

use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::handlers::{extract_language, CallableApiError};

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state that holds shared services
pub struct AppState<M, D>
where
    M: MailTransportTrait,
    D: DocumentStoreTrait,
{
    pub issuer: Arc<VerificationCodeIssuer<M, D>>,
}

/// Handler for POST /sendVerificationCode
///
/// # Request Body
///
/// ```json
/// { "data": { "email": "user@example.com", "code": "482913" } }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "result": { "success": true } }
/// ```
///
/// ## Failure (500)
/// ```json
/// { "error": { "status": "INTERNAL", "message": "Erreur lors de l'envoi du code" } }
/// ```
pub async fn send_verification_code<M, D>(
    req: HttpRequest,
    state: web::Data<AppState<M, D>>,
    request: web::Json<CallableRequest<SendCodeRequest>>,
) -> HttpResponse
where
    M: MailTransportTrait + 'static,
    D: DocumentStoreTrait + 'static,
{
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let lang = extract_language(&req);
    let data = request.into_inner().data;

    let span = tracing::info_span!(
        "send_verification_code",
        request_id = %request_id,
        email = %mask_email(&data.email)
    );

    let mut response = async {
        if let Err(errors) = data.validate() {
            let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
            tracing::warn!(
                fields = ?fields,
                event = "invalid_callable_payload",
                "Rejected verification code request"
            );
            return CallableApiError::internal(lang).error_response();
        }

        match state.issuer.issue_code(&data.email, &data.code).await {
            Ok(result) => HttpResponse::Ok().json(CallableResult::new(SendCodeResponse {
                success: result.success,
            })),
            Err(e) => {
                tracing::warn!(error = %e, "Verification code issuance failed");
                CallableApiError::from_issuance(&e, lang).error_response()
            }
        }
    }
    .instrument(span)
    .await;

    if let Ok(value) = header::HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
