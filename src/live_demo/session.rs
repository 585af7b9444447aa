//! Live demo session state machine.
//!
//! # Responsibilities
//! - Hold the single process-wide demo state
//! - Apply Start/Stop/Update transitions
//! - Mirror every transition through the broadcast hub
//!
//! # Design Decisions
//! - One mutex guards the state; the broadcast happens inside the critical
//!   section so event order always matches state order under the
//!   multithreaded runtime
//! - Start always succeeds, even mid-session (restart overwrites)
//! - Stop is idempotent; Update without an active session is a client error,
//!   since it indicates a desynchronized viewer rather than a safe no-op

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::broadcast::{BroadcastEvent, BroadcastHub};
use crate::error::{ApiError, ApiResult};

/// Shared state of the teacher's live coding demonstration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveDemoState {
    pub active: bool,
    pub title: String,
    pub language: String,
    pub code: String,
    pub started_at: Option<DateTime<Utc>>,
    pub viewer_count: u32,
}

/// The session state machine. Created inactive at process start.
pub struct LiveDemoSession {
    state: Mutex<LiveDemoState>,
    hub: Arc<BroadcastHub>,
}

impl LiveDemoSession {
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self {
            state: Mutex::new(LiveDemoState::default()),
            hub,
        }
    }

    /// Start (or restart) a demo. Resets code, stamps the start time, and
    /// broadcasts the full new state.
    pub fn start(&self, title: String, language: String) -> LiveDemoState {
        let mut state = self.lock();
        *state = LiveDemoState {
            active: true,
            title,
            language,
            code: String::new(),
            started_at: Some(Utc::now()),
            viewer_count: 0,
        };

        let snapshot = state.clone();
        self.hub.publish(&BroadcastEvent::LiveDemoStart {
            state: snapshot.clone(),
        });

        tracing::info!(title = %snapshot.title, language = %snapshot.language, "Live demo started");
        snapshot
    }

    /// Stop the demo. Forgiving: stopping an inactive session is not an
    /// error, and the stop event is broadcast either way.
    pub fn stop(&self) {
        let mut state = self.lock();
        state.active = false;
        self.hub.publish(&BroadcastEvent::LiveDemoStop);

        tracing::info!("Live demo stopped");
    }

    /// Replace the demo code. Only valid while active; broadcasts the new
    /// code only, not the full state.
    pub fn update(&self, code: String) -> ApiResult<()> {
        let mut state = self.lock();
        if !state.active {
            return Err(ApiError::BadRequest("No active live demo".to_string()));
        }

        state.code = code.clone();
        self.hub.publish(&BroadcastEvent::LiveDemoUpdate { code });
        Ok(())
    }

    /// Snapshot of the current state. No broadcast.
    pub fn state(&self) -> LiveDemoState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LiveDemoState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
