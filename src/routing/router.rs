//! Route table and request dispatch.
//!
//! # Responsibilities
//! - Store registered routes in order
//! - Resolve incoming requests to a handler + bound params
//! - Build and run the per-request middleware pipeline
//!
//! # Design Decisions
//! - Immutable after construction (registered once at startup, then shared
//!   via Arc without locks)
//! - First registered structural match wins; registration order is the
//!   entire tie-break contract
//! - Unmatched requests run the same pipeline with a 404 terminal step, so
//!   they still get logging and CORS headers

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::error::{ApiError, ApiResult};
use crate::http::context::RequestContext;
use crate::http::middleware::{CorsStep, ErrorBoundary, LogStep};
use crate::http::pipeline::{MiddlewarePipeline, Next, PipelineStep};
use crate::http::server::AppState;
use crate::routing::matcher::PathPattern;

/// The boxed future every route handler returns.
pub type HandlerFuture<'a> = BoxFuture<'a, ApiResult<()>>;

/// A route handler: reads the context, writes a response (or fails).
pub type HandlerFn = for<'a> fn(&'a AppState, &'a mut RequestContext) -> HandlerFuture<'a>;

/// A (method, pattern, handler) registration.
struct Route {
    method: Method,
    pattern: PathPattern,
    handler: HandlerFn,
}

/// Owns the route table and runs the pipeline per request.
pub struct Router {
    routes: Vec<Route>,
    prelude: Vec<Arc<dyn PipelineStep>>,
    user_steps: Vec<Arc<dyn PipelineStep>>,
    state: AppState,
    max_body_bytes: usize,
}

impl Router {
    pub fn new(state: AppState) -> Self {
        let prelude: Vec<Arc<dyn PipelineStep>> = vec![
            Arc::new(LogStep),
            Arc::new(CorsStep::new(&state.config.cors.allowed_origin)),
            Arc::new(ErrorBoundary),
        ];
        let max_body_bytes = state.config.listener.max_body_bytes;

        Self {
            routes: Vec::new(),
            prelude,
            user_steps: Vec::new(),
            state,
            max_body_bytes,
        }
    }

    /// Register a route. Duplicates are allowed; the first structural match
    /// in registration order wins.
    pub fn register(&mut self, method: Method, pattern: &str, handler: HandlerFn) {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            handler,
        });
    }

    /// Append a middleware step between the error boundary and the handler.
    pub fn middleware(&mut self, step: Arc<dyn PipelineStep>) {
        self.user_steps.push(step);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Resolve (method, path) against the route table.
    fn resolve(&self, method: &Method, path: &str) -> Option<(HandlerFn, std::collections::HashMap<String, String>)> {
        self.routes.iter().find_map(|route| {
            if route.method != *method {
                return None;
            }
            route
                .pattern
                .matches(path)
                .map(|params| (route.handler, params))
        })
    }

    /// Dispatch one request through the full pipeline.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let (parts, body) = request.into_parts();
        let method = parts.method;
        let path = parts.uri.path().to_string();

        let body = match axum::body::to_bytes(body, self.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, path = %path, "Failed to buffer request body");
                return json_error(StatusCode::BAD_REQUEST, "Failed to read request body");
            }
        };

        let mut ctx = RequestContext::new(method.clone(), path.clone(), parts.headers, body);

        let terminal: Arc<dyn PipelineStep> = match self.resolve(&method, &path) {
            Some((handler, params)) => {
                ctx.params = params;
                Arc::new(HandlerStep(handler))
            }
            None => Arc::new(NotFoundStep),
        };

        let mut steps = self.prelude.clone();
        steps.extend(self.user_steps.iter().cloned());
        steps.push(terminal);

        let pipeline = MiddlewarePipeline::new(steps);
        if let Err(err) = pipeline.execute(&self.state, &mut ctx).await {
            // Only a failure in the prelude itself can get here; the boundary
            // swallows everything downstream of it.
            tracing::error!(error = %err, path = %path, "Failure escaped the pipeline");
        }

        ctx.into_response()
    }
}

/// Terminal step wrapping the matched route handler. Never proceeds.
struct HandlerStep(HandlerFn);

#[async_trait]
impl PipelineStep for HandlerStep {
    async fn run(
        &self,
        state: &AppState,
        ctx: &mut RequestContext,
        _next: Next<'_>,
    ) -> ApiResult<()> {
        (self.0)(state, ctx).await
    }
}

/// Terminal step for unmatched requests.
struct NotFoundStep;

#[async_trait]
impl PipelineStep for NotFoundStep {
    async fn run(
        &self,
        _state: &AppState,
        ctx: &mut RequestContext,
        _next: Next<'_>,
    ) -> ApiResult<()> {
        Err(ApiError::NotFound("Not found".to_string()))
    }
}

/// Minimal JSON error used before a request context exists.
fn json_error(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message }).to_string();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
