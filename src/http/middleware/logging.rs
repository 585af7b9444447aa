//! Request logging step.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::http::context::RequestContext;
use crate::http::pipeline::{Next, PipelineStep};
use crate::http::server::AppState;

/// Outermost step: logs one structured line per request, timing the entire
/// downstream chain.
pub struct LogStep;

#[async_trait]
impl PipelineStep for LogStep {
    async fn run(
        &self,
        _state: &AppState,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> ApiResult<()> {
        let start = Instant::now();
        let method = ctx.method().clone();
        let path = ctx.path().to_string();

        let result = next.proceed(ctx).await;

        let status = ctx.status().map(|s| s.as_u16()).unwrap_or(0);
        tracing::info!(
            method = %method,
            path = %path,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );

        result
    }
}
