//! Tenant resolution middleware

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

use super::{Resolution, Signal, TenantResolver};

/// State for the tenant middleware
#[derive(Clone)]
pub struct TenancyState {
    pub resolver: TenantResolver,
    pub header: HeaderName,
}

/// Resolve the request's tenant before any handler runs.
///
/// On success the [`TenantContext`](super::TenantContext) is inserted into the
/// request extensions; bypassed requests continue without one.
pub async fn resolve_tenant(
    State(state): State<TenancyState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Owned copies so no borrow of the request is held across the lookup
    let header_values: Vec<HeaderValue> = request
        .headers()
        .get_all(&state.header)
        .iter()
        .cloned()
        .collect();
    let joined;
    let signal = match header_values.as_slice() {
        [] => Signal::Absent,
        [value] => match value.to_str() {
            Ok(s) => Signal::Present(s),
            Err(_) => Signal::Malformed(value.as_bytes()),
        },
        values => {
            joined = values
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            Signal::Conflicting(&joined)
        }
    };

    match state.resolver.resolve(signal, &path).await {
        Ok(Resolution::Resolved(ctx)) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Ok(Resolution::Bypassed(_)) => next.run(request).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}
