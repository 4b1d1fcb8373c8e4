//! Response envelopes for dispatched actions.
//!
//! # Responsibilities
//! - Represent what an action produced (view body or JSON document)
//! - Render the result under the route's declared envelope
//!
//! # Design Decisions
//! - The envelope is a declaration-time tag on the route, so API
//!   routes force `application/json` without inspecting module names
//! - Under the JSON envelope, view context (body + layout) is dropped
//!   and only the JSON-shaped payload survives
//! - Layout resolution belongs to the external template collaborator;
//!   the engine only carries the layout name through

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Error;

/// How a route's response is enveloped, fixed when the route is
/// declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Render through the view/layout pipeline.
    #[default]
    View,
    /// Force an `application/json` body; view context is stripped.
    ApiJson,
}

/// What a controller action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResponse {
    /// A rendered view body plus the layout it should be framed in.
    View { body: String, layout: String },
    /// A JSON document.
    Json(serde_json::Value),
    /// Nothing; renders as an empty 200.
    Empty,
}

impl ActionResponse {
    pub fn view(body: impl Into<String>, layout: impl Into<String>) -> Self {
        ActionResponse::View {
            body: body.into(),
            layout: layout.into(),
        }
    }
}

/// Render an action response under the route's declared envelope.
pub fn render(format: ResponseFormat, response: ActionResponse) -> Response {
    match format {
        ResponseFormat::ApiJson => {
            let payload = match response {
                ActionResponse::Json(value) => value,
                // View context is dropped under the API envelope; the
                // body string is the only thing worth carrying over.
                ActionResponse::View { body, .. } => json!({ "content": body }),
                ActionResponse::Empty => serde_json::Value::Null,
            };
            axum::Json(payload).into_response()
        }
        ResponseFormat::View => match response {
            ActionResponse::View { body, .. } => (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            ActionResponse::Json(value) => axum::Json(value).into_response(),
            ActionResponse::Empty => StatusCode::OK.into_response(),
        },
    }
}

/// Render an engine error as the client-facing response.
pub fn render_error(error: &Error) -> Response {
    (error.status(), error.to_string()).into_response()
}
