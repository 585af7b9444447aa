//! Classroom data collaborators.
//!
//! The bridge core only needs synchronous accessors returning plain data;
//! the host environment owns the real records. Traits keep the seam
//! explicit, and the in-memory implementations back standalone and test
//! runs.

pub mod notify;
pub mod prompts;
pub mod records;

pub use notify::{NotificationSink, TracingNotifier};
pub use prompts::{PromptCatalog, PromptLibrary, StaticPromptLibrary};
pub use records::{
    ClassStats, EarlyWarning, InMemoryRecords, ProgressRecord, StudentRecords, StudentStats,
    WarningSeverity,
};
