//! Rate limiting middleware, keyed by client address.
//!
//! The key is the TCP peer address. Forwarding headers (`Forwarded`,
//! `X-Forwarded-For`) are only honored when the peer is a trusted proxy.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;

use cookbook_core::ports::RateLimiter;
use cookbook_shared::ErrorResponse;

use crate::observability::current_request_id;

/// Rate limiting middleware factory.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    trusted_proxies: Arc<[IpAddr]>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trusted_proxies: Arc::from(Vec::new()),
        }
    }

    /// Peers whose forwarding headers name the real client.
    pub fn trust_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = proxies.into();
        self
    }
}

fn client_key(req: &ServiceRequest, trusted_proxies: &[IpAddr]) -> String {
    match req.peer_addr().map(|addr| addr.ip()) {
        Some(ip) if trusted_proxies.contains(&ip) => req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_owned)
            .unwrap_or_else(|| ip.to_string()),
        Some(ip) => ip.to_string(),
        None => "unknown".to_string(),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trusted_proxies: self.trusted_proxies.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    trusted_proxies: Arc<[IpAddr]>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();

        let key = client_key(&req, &self.trusted_proxies);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    let retry_after = result.reset_after.as_secs_f64().ceil().max(1.0) as u64;
                    tracing::warn!(client = %key, retry_after, "Rate limit exceeded");

                    let mut error = ErrorResponse::too_many_requests().with_detail(format!(
                        "Request was throttled. Expected available in {retry_after} seconds."
                    ));
                    if let Some(id) = current_request_id() {
                        error = error.with_request_id(id);
                    }

                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    Ok(req.into_response(response).map_into_right_body())
                }
                Ok(_) => Ok(service.call(req).await?.map_into_left_body()),
                Err(e) => {
                    // Fail open
                    tracing::error!(error = %e, "Rate limiter error");
                    Ok(service.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_untrusted_peer_ignores_forwarded_for() {
        let req = TestRequest::default()
            .peer_addr("203.0.113.7:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.1"))
            .to_srv_request();

        assert_eq!(client_key(&req, &[]), "203.0.113.7");
    }

    #[test]
    fn test_trusted_proxy_uses_forwarded_for() {
        let proxy: IpAddr = "10.0.0.1".parse().unwrap();
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.1"))
            .to_srv_request();

        assert_eq!(client_key(&req, &[proxy]), "198.51.100.1");
    }

    #[test]
    fn test_missing_peer_shares_one_bucket() {
        let req = TestRequest::default().to_srv_request();

        assert_eq!(client_key(&req, &[]), "unknown");
    }
}
