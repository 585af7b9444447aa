//! Cross-cutting middleware steps.
//!
//! Fixed prelude order for every request:
//! logging → CORS → error boundary → user middleware → route handler.
//!
//! Logging sits outermost so it times the whole chain. CORS runs before the
//! boundary so even error responses carry the headers, and so OPTIONS
//! preflights short-circuit before any route logic. The boundary guards
//! everything downstream of it.

pub mod cors;
pub mod error_boundary;
pub mod logging;

pub use cors::CorsStep;
pub use error_boundary::ErrorBoundary;
pub use logging::LogStep;
