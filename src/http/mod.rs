//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum catch-all, body buffering)
//!     → context.rs (per-request state: body, params, response slot)
//!     → pipeline.rs (ordered steps in onion order)
//!     → middleware/ (logging → CORS → error boundary)
//!     → matched route handler
//!     → Send to client
//! ```

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod server;

pub use context::RequestContext;
pub use pipeline::{MiddlewarePipeline, Next, PipelineStep};
pub use server::{AppState, HttpServer};
