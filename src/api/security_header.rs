//! Content-Security-Policy middleware.
//!
//! Every response leaving the service, including errors, CORS preflights and
//! unmatched routes, carries the same restrictive policy: only self-origin
//! scripts, styles, fonts and connections, images from self or `data:` URIs,
//! and the Google Fonts origins for styles and fonts.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Request, Response, header};
use tower::{Layer, Service};

/// Policy applied to every response.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
style-src 'self' https://fonts.googleapis.com; \
font-src 'self' https://fonts.gstatic.com; \
connect-src 'self'; \
script-src 'self'; \
img-src 'self' data:;";

// =============================================================================
// Layer
// =============================================================================

/// Tower layer that sets `Content-Security-Policy` on responses.
///
/// A policy already set by the inner service is overwritten.
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicyLayer {
    policy: HeaderValue,
}

impl ContentSecurityPolicyLayer {
    /// Creates the layer with [`CONTENT_SECURITY_POLICY`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        }
    }

    #[must_use]
    pub const fn with_policy(policy: HeaderValue) -> Self {
        Self { policy }
    }
}

impl Default for ContentSecurityPolicyLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for ContentSecurityPolicyLayer {
    type Service = ContentSecurityPolicyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ContentSecurityPolicyService {
            inner,
            policy: self.policy.clone(),
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Service created by [`ContentSecurityPolicyLayer`].
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicyService<S> {
    inner: S,
    policy: HeaderValue,
}

impl<S> Service<Request<Body>> for ContentSecurityPolicyService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, context: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(context)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let policy = self.policy.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            response
                .headers_mut()
                .insert(header::CONTENT_SECURITY_POLICY, policy);
            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
