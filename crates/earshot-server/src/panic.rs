use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::ProcessError;

/// Turn a handler panic into a plain 500
///
/// Used with `CatchPanicLayer`; the panic never reaches the connection task.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(detail, "handler panicked");

    ProcessError::Internal.into_response()
}
