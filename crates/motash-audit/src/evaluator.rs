//! Pass/fail rule for a single task.

use chrono::{DateTime, Utc};
use motash_core::types::APP_EXCEPTION_CODE;
use motash_core::{Failure, Result, TaskState};

use crate::result_codes::AllowedResults;
use crate::source::ScheduledTask;

/// Decides whether one task's last run is a failure.
#[derive(Debug, Clone, Copy)]
pub struct TaskEvaluator {
    /// Watermark: runs strictly before this were seen by an earlier audit.
    since: DateTime<Utc>,
}

impl TaskEvaluator {
    pub fn new(since: DateTime<Utc>) -> Self {
        Self { since }
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }

    /// Evaluate one task. A task whose fields cannot be read is reported as a
    /// failure with the current time and whatever result code is readable.
    pub fn evaluate(&self, task: &dyn ScheduledTask) -> Option<Failure> {
        match self.try_evaluate(task) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("⚠️ Could not evaluate task '{}': {e}", task.path());
                let result = task.last_task_result().unwrap_or(APP_EXCEPTION_CODE);
                Some(Failure::new(task.name(), task.path(), Utc::now(), result))
            }
        }
    }

    fn try_evaluate(&self, task: &dyn ScheduledTask) -> Result<Option<Failure>> {
        match task.state()? {
            TaskState::Disabled | TaskState::Running => return Ok(None),
            _ => {}
        }

        let last_run = task.last_run_time()?;
        if last_run < self.since {
            return Ok(None);
        }

        let allowed = AllowedResults::from_description(&task.description()?);
        let result = task.last_task_result()?;
        if allowed.contains(result) {
            return Ok(None);
        }

        tracing::debug!(
            "Task '{}' ended with {} (allowed: {:?})",
            task.path(),
            result,
            allowed.sorted()
        );
        Ok(Some(Failure::new(task.name(), task.path(), last_run, result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotTask;
    use chrono::TimeZone;
    use motash_core::MotashError;

    fn watermark() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 22, 0, 0, 0).unwrap()
    }

    fn backup_task(result: i32) -> SnapshotTask {
        SnapshotTask::new(
            "Backup",
            "\\Ops\\Backup",
            TaskState::Idle,
            watermark() + chrono::Duration::hours(2),
            result,
            "Backup job {0,1,267009}",
        )
    }

    #[test]
    fn test_allowed_code_passes() {
        let eval = TaskEvaluator::new(watermark());
        assert!(eval.evaluate(&backup_task(1)).is_none());
    }

    #[test]
    fn test_unexpected_code_fails() {
        let eval = TaskEvaluator::new(watermark());
        let task = backup_task(5);
        let failure = eval.evaluate(&task).unwrap();
        assert_eq!(failure.name, "Backup");
        assert_eq!(failure.path, "\\Ops\\Backup");
        assert_eq!(failure.last_run, task.last_run);
        assert_eq!(failure.result, 5);
    }

    #[test]
    fn test_disabled_and_running_skipped() {
        let eval = TaskEvaluator::new(watermark());
        for state in [TaskState::Disabled, TaskState::Running] {
            let mut task = backup_task(99);
            task.state = state;
            assert!(eval.evaluate(&task).is_none(), "{state:?} must be skipped");
        }
    }

    #[test]
    fn test_queued_and_unknown_are_checked() {
        let eval = TaskEvaluator::new(watermark());
        for state in [TaskState::Queued, TaskState::Unknown] {
            let mut task = backup_task(99);
            task.state = state;
            assert!(eval.evaluate(&task).is_some());
        }
    }

    #[test]
    fn test_run_before_watermark_skipped() {
        let eval = TaskEvaluator::new(watermark());
        let mut task = backup_task(99);
        task.last_run = watermark() - chrono::Duration::seconds(1);
        assert!(eval.evaluate(&task).is_none());

        // exactly at the watermark is still checked
        task.last_run = watermark();
        assert!(eval.evaluate(&task).is_some());
    }

    #[test]
    fn test_default_allows_zero_and_running_sentinel() {
        let eval = TaskEvaluator::new(watermark());
        let mut task = backup_task(0);
        task.description = Some("no codes here".into());
        assert!(eval.evaluate(&task).is_none());
        task.last_result = 267009;
        assert!(eval.evaluate(&task).is_none());
        task.last_result = 1;
        assert!(eval.evaluate(&task).is_some());
    }

    struct DamagedTask;

    impl ScheduledTask for DamagedTask {
        fn name(&self) -> &str { "Damaged" }
        fn path(&self) -> &str { "\\Ops\\Damaged" }
        fn state(&self) -> Result<TaskState> { Ok(TaskState::Idle) }
        fn last_run_time(&self) -> Result<DateTime<Utc>> {
            Err(MotashError::task("definition unreadable"))
        }
        fn last_task_result(&self) -> Result<i32> { Ok(2) }
        fn description(&self) -> Result<String> { Ok(String::new()) }
    }

    #[test]
    fn test_read_error_reports_task() {
        let eval = TaskEvaluator::new(watermark());
        let failure = eval.evaluate(&DamagedTask).unwrap();
        assert_eq!(failure.name, "Damaged");
        assert_eq!(failure.path, "\\Ops\\Damaged");
        assert_eq!(failure.result, 2);
    }

    #[test]
    fn test_unreadable_description_reports_task() {
        let eval = TaskEvaluator::new(watermark());
        let mut task = backup_task(0);
        task.read_error = Some("corrupt registration".into());
        let failure = eval.evaluate(&task).unwrap();
        // result code is still readable, even though 0 would have passed
        assert_eq!(failure.result, 0);
        assert_eq!(failure.path, "\\Ops\\Backup");
    }

    struct UnreadableTask;

    impl ScheduledTask for UnreadableTask {
        fn name(&self) -> &str { "Ghost" }
        fn path(&self) -> &str { "\\Ghost" }
        fn state(&self) -> Result<TaskState> { Err(MotashError::task("access denied")) }
        fn last_run_time(&self) -> Result<DateTime<Utc>> { Err(MotashError::task("access denied")) }
        fn last_task_result(&self) -> Result<i32> { Err(MotashError::task("access denied")) }
        fn description(&self) -> Result<String> { Err(MotashError::task("access denied")) }
    }

    #[test]
    fn test_unreadable_result_uses_marker() {
        let eval = TaskEvaluator::new(watermark());
        let failure = eval.evaluate(&UnreadableTask).unwrap();
        assert_eq!(failure.name, "Ghost");
        assert_eq!(failure.result, APP_EXCEPTION_CODE);
    }
}
