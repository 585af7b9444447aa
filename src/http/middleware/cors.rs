//! CORS step.
//!
//! The single place CORS is handled: headers are attached to every response
//! here, and OPTIONS preflights are answered with 204 before any route logic,
//! for every path uniformly.

use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method, StatusCode};

use crate::error::ApiResult;
use crate::http::context::RequestContext;
use crate::http::pipeline::{Next, PipelineStep};
use crate::http::server::AppState;

pub struct CorsStep {
    allow_origin: HeaderValue,
}

impl CorsStep {
    pub fn new(allowed_origin: &str) -> Self {
        let allow_origin = HeaderValue::from_str(allowed_origin).unwrap_or_else(|_| {
            tracing::warn!(origin = %allowed_origin, "Unusable CORS origin, falling back to *");
            HeaderValue::from_static("*")
        });
        Self { allow_origin }
    }
}

#[async_trait]
impl PipelineStep for CorsStep {
    async fn run(
        &self,
        _state: &AppState,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> ApiResult<()> {
        ctx.insert_response_header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        ctx.insert_response_header(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        ctx.insert_response_header(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );

        if ctx.method() == Method::OPTIONS {
            // Preflight: never reaches route logic.
            ctx.no_content(StatusCode::NO_CONTENT);
            return Ok(());
        }

        next.proceed(ctx).await
    }
}
