//! Broadcast event payloads.

use axum::body::Bytes;
use serde::Serialize;

use crate::live_demo::LiveDemoState;

/// An event pushed to every subscribed client.
///
/// The `type` tag is the wire discriminator clients switch on. Payloads are
/// deliberately minimal: `liveDemoUpdate` carries only the new code, not the
/// full state.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BroadcastEvent {
    /// A live demo started (or restarted). Carries the full new state.
    LiveDemoStart { state: LiveDemoState },

    /// The live demo stopped. Tag only.
    LiveDemoStop,

    /// The demo code changed.
    LiveDemoUpdate { code: String },

    /// A teacher announcement to every connected client.
    #[serde(rename_all = "camelCase")]
    TeacherBroadcast {
        message: String,
        message_type: String,
    },
}

impl BroadcastEvent {
    /// Serialize into a complete server-sent-event frame.
    pub fn sse_frame(&self) -> Result<Bytes, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(Bytes::from(format!("data: {json}\n\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_camel_case() {
        let frame = BroadcastEvent::LiveDemoStop.sse_frame().unwrap();
        let text = std::str::from_utf8(&frame).unwrap();
        assert_eq!(text, "data: {\"type\":\"liveDemoStop\"}\n\n");
    }

    #[test]
    fn update_carries_code_only() {
        let frame = BroadcastEvent::LiveDemoUpdate {
            code: "print('hi')".into(),
        }
        .sse_frame()
        .unwrap();
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(text.contains("\"type\":\"liveDemoUpdate\""));
        assert!(text.contains("\"code\":\"print('hi')\""));
        assert!(!text.contains("title"));
    }

    #[test]
    fn teacher_broadcast_renames_message_type() {
        let frame = BroadcastEvent::TeacherBroadcast {
            message: "break in 5".into(),
            message_type: "info".into(),
        }
        .sse_frame()
        .unwrap();
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(text.contains("\"messageType\":\"info\""));
    }
}
