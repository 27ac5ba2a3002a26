//! Transport security for the callable endpoint
//!
//! Plain HTTP is refused when `server.enforce_https` is set, with the same
//! callable `INTERNAL` error as any other failure. A proxy's
//! `X-Forwarded-Proto` only counts when the peer is listed in
//! `server.trusted_proxies`. [`HEALTH_PATH`] is never refused so load
//! balancers can poll it over plain HTTP. Outside development every response
//! carries the headers in [`SECURITY_HEADERS`].

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use mp_shared::config::{Environment, ServerConfig};

use crate::handlers::{extract_language, CallableApiError};

/// Liveness route exempt from HTTPS enforcement
pub const HEALTH_PATH: &str = "/health";

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Headers added to responses outside development
pub const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (header::STRICT_TRANSPORT_SECURITY, "max-age=31536000; includeSubDomains"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::CONTENT_SECURITY_POLICY, "default-src 'none'; frame-ancestors 'none'"),
];

#[derive(Debug, Clone, Default)]
struct SecurityPolicy {
    enforce_https: bool,
    add_headers: bool,
    trusted_proxies: Vec<String>,
}

impl SecurityPolicy {
    fn allows(&self, req: &ServiceRequest) -> bool {
        !self.enforce_https || req.path() == HEALTH_PATH || self.is_secure(req)
    }

    fn is_secure(&self, req: &ServiceRequest) -> bool {
        let headers = req.headers();

        // ConnectionInfo::scheme believes forwarding headers from anyone
        if !headers.contains_key(X_FORWARDED_PROTO) && !headers.contains_key(header::FORWARDED) {
            return req.connection_info().scheme() == "https";
        }

        let from_trusted_peer = req
            .peer_addr()
            .map(|addr| self.trusts(&addr.ip().to_string()))
            .unwrap_or(false);

        from_trusted_peer
            && headers
                .get(X_FORWARDED_PROTO)
                .and_then(|value| value.to_str().ok())
                .map(|proto| proto.eq_ignore_ascii_case("https"))
                .unwrap_or(false)
    }

    fn trusts(&self, peer_ip: &str) -> bool {
        self.trusted_proxies.iter().any(|proxy| proxy == peer_ip)
    }

    fn decorate<B>(&self, response: &mut ServiceResponse<B>) {
        if !self.add_headers {
            return;
        }
        let headers = response.headers_mut();
        for (name, value) in SECURITY_HEADERS.iter() {
            headers.insert(name.clone(), HeaderValue::from_static(*value));
        }
    }
}

/// Middleware factory wrapping the app in [`create_app`](crate::app::create_app)
#[derive(Debug, Clone)]
pub struct SecurityMiddleware {
    policy: SecurityPolicy,
}

impl SecurityMiddleware {
    pub fn from_config(server: &ServerConfig, environment: Environment) -> Self {
        let policy = SecurityPolicy {
            enforce_https: server.enforce_https,
            add_headers: !environment.is_development(),
            trusted_proxies: server.trusted_proxies.clone(),
        };

        tracing::info!(
            enforce_https = policy.enforce_https,
            add_headers = policy.add_headers,
            trusted_proxies = policy.trusted_proxies.len(),
            "Security middleware configured"
        );

        Self { policy }
    }

    /// Pass-through
    pub fn development() -> Self {
        Self {
            policy: SecurityPolicy::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            policy: SecurityPolicy {
                enforce_https: true,
                add_headers: true,
                trusted_proxies: Vec::new(),
            },
        }
    }

    pub fn with_trusted_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.policy.trusted_proxies.push(proxy.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            policy: Rc::new(self.policy.clone()),
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    policy: Rc<SecurityPolicy>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = Rc::clone(&self.policy);

        Box::pin(async move {
            if !policy.allows(&req) {
                tracing::warn!(
                    event = "insecure_request_rejected",
                    method = %req.method(),
                    path = %req.path(),
                    "Plain HTTP request refused"
                );
                let language = extract_language(req.request());
                return Err(CallableApiError::internal(language).into());
            }

            let mut response = service.call(req).await?;
            policy.decorate(&mut response);
            Ok(response)
        })
    }
}
