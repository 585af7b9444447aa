//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route table scan, registration order)
//!     → matcher.rs (segment-wise pattern match, bind :params)
//!     → Return: matched handler + params, or explicit no-match
//! ```
//!
//! # Design Decisions
//! - Patterns are literal segments plus `:named` captures; no regex
//! - First registered match wins; no specificity ranking, so callers
//!   register more specific paths before more general ones
//! - No-match is a normal value answered with 404, not an error

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::Router;
