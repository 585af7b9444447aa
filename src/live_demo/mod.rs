//! Live demo session subsystem.
//!
//! A teacher-led coding demonstration is a two-state machine
//! (Inactive ⇄ Active) mutated only through Start/Stop/Update commands,
//! every transition mirrored through the broadcast hub.

pub mod session;

pub use session::{LiveDemoSession, LiveDemoState};
