//! Classroom bridge: an in-process HTTP endpoint for shared session state.
//!
//! External clients (a Discord bot, a teacher dashboard, a live-coding
//! viewer) read and mutate classroom state hosted in this long-running
//! process. The core is the request-dispatch and live-session-broadcast
//! engine:
//!
//! ```text
//! raw request
//!     → http::server (Axum catch-all)
//!     → routing (pattern match, bind :params)
//!     → http::pipeline [logging → CORS → error boundary → handler]
//!     → handler reads/mutates classroom or live-demo state
//!     → broadcast::hub fans mutations out to every subscribed stream
//! ```

pub mod api;
pub mod broadcast;
pub mod classroom;
pub mod config;
pub mod error;
pub mod http;
pub mod live_demo;
pub mod routing;

pub use config::BridgeConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpServer;
