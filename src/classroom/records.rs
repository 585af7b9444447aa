//! Student record access.
//!
//! # Responsibilities
//! - Identify the current student (stable id per process)
//! - Serve progress records, per-student stats, class aggregates, and
//!   early-warning indicators
//!
//! # Design Decisions
//! - All accessors are synchronous and return plain data
//! - The in-memory provider seeds plausible demo students with `fastrand`
//!   so the dashboard has something to show in standalone runs

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ClassroomConfig;

/// One student's own progress record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub student_id: String,
    pub exercises_completed: u32,
    pub current_streak: u32,
    pub last_exercise: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-student statistics shown on the teacher dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub student_id: String,
    pub name: String,
    pub year_level: u32,
    pub exercises_completed: u32,
    pub total_attempts: u32,
    pub success_rate: f64,
    pub last_active: Option<DateTime<Utc>>,
}

/// Aggregate statistics across the class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStats {
    pub total_students: usize,
    pub active_today: usize,
    pub average_success_rate: f64,
    pub exercises_completed: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Low,
    Medium,
    High,
}

/// An early-warning indicator for a struggling or inactive student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyWarning {
    pub student_id: String,
    pub name: String,
    pub severity: WarningSeverity,
    pub reason: String,
}

/// Synchronous access to student data. Owned by the host environment in the
/// real deployment; the bridge only reads through this seam.
pub trait StudentRecords: Send + Sync {
    /// Stable id of the student this process belongs to, created on first use.
    fn get_or_create_student_id(&self) -> String;

    /// This student's progress record, if any exists yet.
    fn load_student_data(&self, student_id: &str) -> Option<ProgressRecord>;

    fn all_student_stats(&self) -> Vec<StudentStats>;

    fn class_stats(&self) -> ClassStats;

    fn early_warnings(&self) -> Vec<EarlyWarning>;
}

/// In-memory provider seeded with demo students.
pub struct InMemoryRecords {
    own_id: OnceLock<String>,
    records: Mutex<HashMap<String, ProgressRecord>>,
    stats: Vec<StudentStats>,
}

const DEMO_NAMES: &[&str] = &[
    "Aisha", "Ben", "Chloe", "Dev", "Ella", "Finn", "Grace", "Hamid", "Isla", "Jack", "Kira",
    "Liam", "Mia", "Noah", "Priya", "Quinn", "Ruby", "Sam", "Tara", "Umar",
];

impl InMemoryRecords {
    /// Seed a class of plausible demo students.
    pub fn seeded(classroom: &ClassroomConfig) -> Self {
        let now = Utc::now();
        let mut stats = Vec::with_capacity(classroom.student_count);
        let mut records = HashMap::new();

        for i in 0..classroom.student_count {
            let student_id = Uuid::new_v4().to_string();
            let name = DEMO_NAMES[i % DEMO_NAMES.len()].to_string();
            let completed = fastrand::u32(0..40);
            let attempts = completed + fastrand::u32(0..25);
            let success_rate = if attempts == 0 {
                0.0
            } else {
                f64::from(completed) / f64::from(attempts)
            };
            let last_active = now - Duration::hours(i64::from(fastrand::u32(0..72)));

            records.insert(
                student_id.clone(),
                ProgressRecord {
                    student_id: student_id.clone(),
                    exercises_completed: completed,
                    current_streak: fastrand::u32(0..7),
                    last_exercise: Some(format!("exercise-{}", completed.max(1))),
                    updated_at: Some(last_active),
                },
            );
            stats.push(StudentStats {
                student_id,
                name,
                year_level: classroom.year_level,
                exercises_completed: completed,
                total_attempts: attempts,
                success_rate,
                last_active: Some(last_active),
            });
        }

        Self {
            own_id: OnceLock::new(),
            records: Mutex::new(records),
            stats,
        }
    }

    /// An empty provider, useful for tests that want no seed data.
    pub fn empty() -> Self {
        Self {
            own_id: OnceLock::new(),
            records: Mutex::new(HashMap::new()),
            stats: Vec::new(),
        }
    }
}

impl StudentRecords for InMemoryRecords {
    fn get_or_create_student_id(&self) -> String {
        self.own_id
            .get_or_init(|| Uuid::new_v4().to_string())
            .clone()
    }

    fn load_student_data(&self, student_id: &str) -> Option<ProgressRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(student_id)
            .cloned()
    }

    fn all_student_stats(&self) -> Vec<StudentStats> {
        self.stats.clone()
    }

    fn class_stats(&self) -> ClassStats {
        let total_students = self.stats.len();
        let cutoff = Utc::now() - Duration::hours(24);
        let active_today = self
            .stats
            .iter()
            .filter(|s| s.last_active.is_some_and(|t| t > cutoff))
            .count();
        let average_success_rate = if total_students == 0 {
            0.0
        } else {
            self.stats.iter().map(|s| s.success_rate).sum::<f64>() / total_students as f64
        };
        let exercises_completed = self.stats.iter().map(|s| s.exercises_completed).sum();

        ClassStats {
            total_students,
            active_today,
            average_success_rate,
            exercises_completed,
        }
    }

    fn early_warnings(&self) -> Vec<EarlyWarning> {
        let stale = Utc::now() - Duration::hours(48);
        self.stats
            .iter()
            .filter_map(|s| {
                if s.total_attempts >= 5 && s.success_rate < 0.3 {
                    Some(EarlyWarning {
                        student_id: s.student_id.clone(),
                        name: s.name.clone(),
                        severity: WarningSeverity::High,
                        reason: "Low success rate over recent attempts".to_string(),
                    })
                } else if s.last_active.is_none_or(|t| t < stale) {
                    Some(EarlyWarning {
                        student_id: s.student_id.clone(),
                        name: s.name.clone(),
                        severity: WarningSeverity::Medium,
                        reason: "No activity in the last two days".to_string(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}
