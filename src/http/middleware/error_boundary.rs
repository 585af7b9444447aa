//! Error boundary step.
//!
//! The one place uncaught failures from the downstream chain become HTTP
//! responses. Client errors keep their message; anything else becomes a
//! generic 500. The headers-sent check matters because a step can fail
//! *after* writing a response; replacing that response would be worse than
//! logging and moving on.

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::error::{ApiError, ApiResult};
use crate::http::context::RequestContext;
use crate::http::pipeline::{Next, PipelineStep};
use crate::http::server::AppState;

pub struct ErrorBoundary;

#[async_trait]
impl PipelineStep for ErrorBoundary {
    async fn run(
        &self,
        _state: &AppState,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> ApiResult<()> {
        let Err(err) = next.proceed(ctx).await else {
            return Ok(());
        };

        if ctx.response_sent() {
            tracing::warn!(error = %err, "Step failed after response was written");
            return Ok(());
        }

        let (status, message) = match &err {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            other => {
                tracing::error!(error = %other, "Unhandled failure in pipeline");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        ctx.json(status, &serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method};

    use crate::http::pipeline::MiddlewarePipeline;

    struct FailWith(fn() -> ApiError);

    #[async_trait]
    impl PipelineStep for FailWith {
        async fn run(
            &self,
            _state: &AppState,
            _ctx: &mut RequestContext,
            _next: Next<'_>,
        ) -> ApiResult<()> {
            Err((self.0)())
        }
    }

    struct RespondThenFail;

    #[async_trait]
    impl PipelineStep for RespondThenFail {
        async fn run(
            &self,
            _state: &AppState,
            ctx: &mut RequestContext,
            _next: Next<'_>,
        ) -> ApiResult<()> {
            ctx.json(StatusCode::OK, &serde_json::json!({"partial": true}))?;
            Err(ApiError::Internal("too late".into()))
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/t".into(), HeaderMap::new(), Bytes::new())
    }

    async fn run(steps: Vec<Arc<dyn PipelineStep>>) -> RequestContext {
        let pipeline = MiddlewarePipeline::new(steps);
        let state = AppState::for_tests();
        let mut ctx = ctx();
        pipeline.execute(&state, &mut ctx).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn client_error_keeps_its_message() {
        let ctx = run(vec![
            Arc::new(ErrorBoundary),
            Arc::new(FailWith(|| ApiError::BadRequest("No active live demo".into()))),
        ])
        .await;
        assert_eq!(ctx.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn unexpected_failure_becomes_generic_500() {
        let ctx = run(vec![
            Arc::new(ErrorBoundary),
            Arc::new(FailWith(|| ApiError::Internal("secret detail".into()))),
        ])
        .await;
        assert_eq!(ctx.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn existing_response_is_not_replaced() {
        let ctx = run(vec![Arc::new(ErrorBoundary), Arc::new(RespondThenFail)]).await;
        assert_eq!(ctx.status(), Some(StatusCode::OK));
    }
}
