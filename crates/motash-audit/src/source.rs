//! Read-only view of an operating-system task scheduler.

use chrono::{DateTime, Utc};
use motash_core::{Result, TaskState};

/// Something that can open a scheduler session.
pub trait TaskSource {
    /// Open a session. The session is released when the returned value is dropped.
    fn connect(&self) -> Result<Box<dyn TaskService + '_>>;
}

/// An open scheduler session.
pub trait TaskService {
    fn root_folder(&self) -> Result<Box<dyn TaskFolder + '_>>;

    /// When the data behind this session was captured. `None` for a live
    /// scheduler, where the data is current as of the walk itself.
    fn captured_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// A folder in the scheduler hierarchy.
pub trait TaskFolder {
    fn name(&self) -> &str;
    fn subfolders(&self) -> Result<Vec<Box<dyn TaskFolder + '_>>>;
    fn tasks(&self) -> Result<Vec<Box<dyn ScheduledTask + '_>>>;
}

/// One registered task. Identity is always available; everything else may
/// fail to read on a damaged registration.
pub trait ScheduledTask {
    fn name(&self) -> &str;
    fn path(&self) -> &str;
    fn state(&self) -> Result<TaskState>;
    fn last_run_time(&self) -> Result<DateTime<Utc>>;
    fn last_task_result(&self) -> Result<i32>;
    /// Registration description, empty when unset.
    fn description(&self) -> Result<String>;
}
