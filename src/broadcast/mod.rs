//! Broadcast subsystem.
//!
//! # Data Flow
//! ```text
//! handler mutates session state
//!     → hub.publish(event)
//!     → events.rs (serialize once into an SSE frame)
//!     → fan out to a snapshot of subscriber channels
//!     → each subscriber's HTTP response stream
//! ```
//!
//! # Design Decisions
//! - Fire-and-forget per subscriber: one dead connection never blocks the rest
//! - Events serialized exactly once per publish, identical bytes to everyone
//! - Delivery order equals publish order (unbounded FIFO channels, publish lock)
//! - No backpressure: slow consumers are the transport's problem

pub mod events;
pub mod hub;

pub use events::BroadcastEvent;
pub use hub::{BroadcastHub, Subscription};
