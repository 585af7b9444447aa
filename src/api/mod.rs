//! HTTP API surface.
//!
//! # Data Flow
//! ```text
//! Router (catch-all dispatch)
//!     → mod.rs (route registrations, in precedence order)
//!     → handlers.rs (read/mutate collaborators + session, write JSON)
//!     → types.rs (request/response payload shapes)
//! ```

pub mod handlers;
pub mod types;

use axum::http::Method;

use crate::routing::Router;

/// Register every route. Order matters: more specific paths go before
/// clashing capture patterns because the first structural match wins.
pub fn register_routes(router: &mut Router) {
    router.register(Method::GET, "/api/progress", handlers::progress);

    router.register(Method::GET, "/api/teacher/students", handlers::teacher_students);
    router.register(Method::GET, "/api/teacher/class-stats", handlers::class_stats);
    router.register(Method::GET, "/api/teacher/warnings", handlers::warnings);
    router.register(Method::GET, "/api/teacher/dashboard", handlers::dashboard);
    router.register(Method::POST, "/api/teacher/broadcast", handlers::teacher_broadcast);

    router.register(Method::GET, "/api/prompts", handlers::prompt_catalog);
    router.register(Method::GET, "/api/prompts/:type", handlers::prompt_by_type);
    router.register(
        Method::GET,
        "/api/adaptive-prompts/:yearLevel",
        handlers::adaptive_prompts,
    );

    router.register(Method::GET, "/api/health", handlers::health);

    router.register(
        Method::POST,
        "/api/teacher/live-demo/start",
        handlers::live_demo_start,
    );
    router.register(
        Method::POST,
        "/api/teacher/live-demo/stop",
        handlers::live_demo_stop,
    );
    router.register(
        Method::GET,
        "/api/teacher/live-demo/state",
        handlers::live_demo_state,
    );
    router.register(
        Method::POST,
        "/api/teacher/live-demo/update",
        handlers::live_demo_update,
    );

    router.register(Method::GET, "/api/events", handlers::subscribe_events);
}
