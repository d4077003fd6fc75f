//! Error response finishing.
//!
//! Handlers and extractors only know the error; the request path is added
//! here so every error body reads `{"detail", "type", "path"}`.

use std::any::Any;

use axum::{
    extract::Request,
    http::{header::CONTENT_LENGTH, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::ErrorBody;

/// Attach the request path to error responses produced further in.
pub async fn error_path_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    let Some(body) = response.extensions_mut().remove::<ErrorBody>() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let body = Json(body.with_path(path)).into_response().into_body();
    Response::from_parts(parts, body)
}

/// Turn a handler panic into the generic internal error response.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Unhandled panic in request handler: {}", detail);

    ErrorBody::internal().into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
}
