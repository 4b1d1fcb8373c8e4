//! Request identity.
//!
//! # Responsibilities
//! - Stamp every inbound request with an `x-request-id` (UUID v4)
//! - Propagate the id onto the response for correlation
//!
//! # Design Decisions
//! - The id is attached as early as possible so every trace line and
//!   metric for the request can be correlated
//! - An id already supplied by the client is kept, not replaced

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// UUID v4 request-id generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Layer that sets `x-request-id` when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
