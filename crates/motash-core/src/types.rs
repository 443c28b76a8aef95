//! Failure model and task state shared between the audit engine and notifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker result code for a failed precondition ("Application Warning").
pub const SETUP_PROBLEM_CODE: i32 = -10557;

/// Marker result code for an exception during the walk ("Application Exception").
pub const APP_EXCEPTION_CODE: i32 = -10556;

pub const SETUP_PROBLEM_NAME: &str = "Application Warning";
pub const APP_EXCEPTION_NAME: &str = "Application Exception";

/// Run state reported by the task scheduler.
///
/// Parsing ignores case and accepts the scheduler's own names, so `"Ready"`
/// reads as [`TaskState::Idle`]. Anything unrecognised is `Unknown`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskState {
    Idle,
    Queued,
    Running,
    Disabled,
    #[default]
    Unknown,
}

impl From<&str> for TaskState {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" | "ready" => Self::Idle,
            "queued" => Self::Queued,
            "running" => Self::Running,
            "disabled" => Self::Disabled,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// One reported problem: a task that failed its rule, or an
/// infrastructure/setup problem carried in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub name: String,
    /// Hierarchical task path, or the problem message for synthetic failures.
    pub path: String,
    pub last_run: DateTime<Utc>,
    pub result: i32,
}

impl Failure {
    pub fn new(name: &str, path: &str, last_run: DateTime<Utc>, result: i32) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            last_run,
            result,
        }
    }

    /// Precondition failure (OS, service, missing configuration).
    pub fn setup_problem(message: &str) -> Self {
        Self::new(SETUP_PROBLEM_NAME, message, Utc::now(), SETUP_PROBLEM_CODE)
    }

    /// Unexpected error while talking to the scheduler.
    pub fn application_exception(message: &str) -> Self {
        Self::new(APP_EXCEPTION_NAME, message, Utc::now(), APP_EXCEPTION_CODE)
    }

    /// True for the synthetic failures produced by the engine itself.
    /// A task whose result could not be read carries the exception code but
    /// keeps its own name, so it is not synthetic.
    pub fn is_synthetic(&self) -> bool {
        (self.result == SETUP_PROBLEM_CODE && self.name == SETUP_PROBLEM_NAME)
            || (self.result == APP_EXCEPTION_CODE && self.name == APP_EXCEPTION_NAME)
    }
}
