//! Audit Engine — checks preconditions, walks the scheduler and collects failures.
//! One run is synchronous and sequential; the scheduler session lives only
//! for the duration of the walk.

use chrono::{DateTime, Utc};
use motash_core::config::AuditConfig;
use motash_core::{Failure, Result};

use crate::evaluator::TaskEvaluator;
use crate::host::Environment;
use crate::source::TaskSource;
use crate::walker::FolderWalker;

/// Audit rules, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Default)]
pub struct AuditSettings {
    /// Case-insensitive regex for top-level folder names. Must be non-empty.
    pub root_folder_pattern: String,
    /// Also check tasks that sit directly in the root folder.
    pub check_root_tasks: bool,
}

impl AuditSettings {
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            root_folder_pattern: config.root_folder_pattern.clone(),
            check_root_tasks: config.check_root_tasks,
        }
    }
}

/// The audit engine. Owns the failure list of the latest run.
pub struct AuditEngine {
    settings: AuditSettings,
    /// Watermark. Only moves when the caller sets it.
    last_check: DateTime<Utc>,
    source: Box<dyn TaskSource>,
    environment: Box<dyn Environment>,
    failures: Vec<Failure>,
    setup_problem: bool,
    /// The latest walk reached the end without an error.
    walk_completed: bool,
    /// Capture time of the data the latest walk saw, when the source knows it.
    captured_at: Option<DateTime<Utc>>,
}

impl AuditEngine {
    /// Create an engine with the watermark at the Unix epoch.
    pub fn new(
        settings: AuditSettings,
        source: Box<dyn TaskSource>,
        environment: Box<dyn Environment>,
    ) -> Self {
        Self {
            settings,
            last_check: DateTime::<Utc>::UNIX_EPOCH,
            source,
            environment,
            failures: Vec::new(),
            setup_problem: false,
            walk_completed: false,
            captured_at: None,
        }
    }

    pub fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    pub fn set_last_check(&mut self, at: DateTime<Utc>) {
        self.last_check = at;
    }

    /// Failures of the latest run, in discovery order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// True when the latest run stopped on a precondition.
    pub fn has_setup_problem(&self) -> bool {
        self.setup_problem
    }

    /// True when the latest run walked every folder in scope.
    pub fn walk_completed(&self) -> bool {
        self.walk_completed
    }

    /// Watermark for the next run, given when this run started.
    ///
    /// `None` when the run did not finish its walk: tasks it never reached
    /// must still be checked next time. Otherwise the source's capture time,
    /// or `started` for a live source.
    pub fn next_watermark(&self, started: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.walk_completed {
            return None;
        }
        Some(self.captured_at.unwrap_or(started))
    }

    /// Run the audit and return the number of problems found.
    pub fn check(&mut self) -> usize {
        self.run_audit().1
    }

    /// Run the audit. Each run starts from an empty failure list.
    pub fn run_audit(&mut self) -> (&[Failure], usize) {
        self.failures.clear();
        self.setup_problem = false;
        self.walk_completed = false;
        self.captured_at = None;

        if !self.environment.os_supported() {
            return self.set_problem("Windows Vista or newer is required");
        }
        if !self.environment.scheduler_service_running() {
            return self.set_problem("The Task Scheduler service is not running");
        }
        if self.settings.root_folder_pattern.is_empty() {
            return self.set_problem("No RootFolderPattern set, check your config file.");
        }

        if let Err(e) = self.walk() {
            tracing::warn!("💥 Audit aborted: {e}");
            self.failures.push(Failure::application_exception(&e.to_string()));
        }

        tracing::info!("🔎 Audit finished: {} problem(s)", self.failures.len());
        (&self.failures, self.failures.len())
    }

    fn set_problem(&mut self, problem: &str) -> (&[Failure], usize) {
        tracing::warn!("⚠️ Setup problem: {problem}");
        self.setup_problem = true;
        self.failures.push(Failure::setup_problem(problem));
        (&self.failures, self.failures.len())
    }

    fn walk(&mut self) -> Result<()> {
        let evaluator = TaskEvaluator::new(self.last_check);
        let mut walker = FolderWalker::new(&evaluator, &self.settings.root_folder_pattern)?;

        // Dropped at the end of this scope on every path, which closes the session.
        let service = self.source.connect()?;
        self.captured_at = service.captured_at();
        let root = service.root_folder()?;

        if self.settings.check_root_tasks {
            walker.check_tasks(root.as_ref(), &mut self.failures)?;
        }
        walker.walk(root.as_ref(), &mut self.failures)?;

        tracing::debug!(
            "Walked {} folder(s), {} task(s) since {}",
            walker.folders_checked(),
            walker.tasks_checked(),
            evaluator.since()
        );
        self.walk_completed = true;
        Ok(())
    }
}
