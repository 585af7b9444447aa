//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the classroom bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// CORS settings applied by the middleware pipeline.
    pub cors: CorsConfig,

    /// Classroom seed data for standalone/demo runs.
    pub classroom: ClassroomConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3917").
    pub bind_address: String,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3917".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value for Access-Control-Allow-Origin on every response.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

/// Seed data for the in-memory classroom providers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassroomConfig {
    /// Display name used in health and dashboard responses.
    pub class_name: String,

    /// Year level the adaptive prompt selection defaults to.
    pub year_level: u32,

    /// Number of demo students seeded at startup.
    pub student_count: usize,
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            class_name: "Demo Class".to_string(),
            year_level: 9,
            student_count: 12,
        }
    }
}
