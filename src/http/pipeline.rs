//! Middleware pipeline execution.
//!
//! # Responsibilities
//! - Compose an ordered list of steps into a single execution
//! - Give each step an explicit continuation over the remaining steps
//!
//! # Design Decisions
//! - Onion order: a step may work before *and* after awaiting `Next::proceed`,
//!   so one step can time or inspect the entire downstream chain
//! - `Next` is consumed by value, making "call the continuation at most once"
//!   a compile-time property rather than a runtime convention
//! - Short-circuiting is legitimate only by writing a response and returning
//!   without proceeding; a step that does neither yields an empty response,
//!   handled by `RequestContext::into_response`
//! - No timeout safety net for steps that never complete: handlers are a
//!   small, trusted, in-process set

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::http::context::RequestContext;
use crate::http::server::AppState;

/// One middleware or handler unit in the ordered execution chain.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    async fn run(
        &self,
        state: &AppState,
        ctx: &mut RequestContext,
        next: Next<'_>,
    ) -> ApiResult<()>;
}

/// Continuation over the remaining steps of the chain.
pub struct Next<'a> {
    state: &'a AppState,
    steps: &'a [Arc<dyn PipelineStep>],
}

impl<'a> Next<'a> {
    /// Run the rest of the chain, returning once every downstream step has
    /// completed (or one of them failed).
    pub async fn proceed(self, ctx: &mut RequestContext) -> ApiResult<()> {
        match self.steps.split_first() {
            Some((step, rest)) => {
                step.run(
                    self.state,
                    ctx,
                    Next {
                        state: self.state,
                        steps: rest,
                    },
                )
                .await
            }
            None => Ok(()),
        }
    }
}

/// An ordered list of steps executed per request.
pub struct MiddlewarePipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
}

impl MiddlewarePipeline {
    pub fn new(steps: Vec<Arc<dyn PipelineStep>>) -> Self {
        Self { steps }
    }

    pub async fn execute(&self, state: &AppState, ctx: &mut RequestContext) -> ApiResult<()> {
        Next {
            state,
            steps: &self.steps,
        }
        .proceed(ctx)
        .await
    }
}
