//! Host notification sink.
//!
//! Urgent teacher broadcasts are surfaced through the host environment's own
//! notification UI in the real deployment. The bridge only needs the seam.

/// Sink for messages that should surface outside the event stream.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, urgent: bool);
}

/// Default sink: writes notifications to the log.
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str, urgent: bool) {
        if urgent {
            tracing::warn!(message = %message, "Urgent teacher notification");
        } else {
            tracing::info!(message = %message, "Teacher notification");
        }
    }
}
