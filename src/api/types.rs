//! Request and response payload shapes.
//!
//! Each mutating endpoint gets its own schema struct so malformed bodies
//! fail at decode with a client error instead of being trusted at use-site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classroom::{ClassStats, EarlyWarning, StudentStats};

/// Body of POST /api/teacher/broadcast.
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub message: String,
    #[serde(rename = "type", default = "default_message_type")]
    pub message_type: String,
}

fn default_message_type() -> String {
    "info".to_string()
}

/// Body of POST /api/teacher/live-demo/start.
#[derive(Debug, Deserialize)]
pub struct StartDemoRequest {
    pub title: String,
    pub language: String,
}

/// Body of POST /api/teacher/live-demo/update.
#[derive(Debug, Deserialize)]
pub struct UpdateDemoRequest {
    pub code: String,
}

/// Response of GET /api/teacher/dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub class_stats: ClassStats,
    pub students: Vec<StudentStats>,
    pub warnings: Vec<EarlyWarning>,
    pub last_updated: DateTime<Utc>,
}
