//! JSON snapshot of a scheduler folder tree.
//! An exporter on the scheduler host dumps folders and tasks to one file;
//! the audit reads it as a [`TaskSource`]. Also used to build trees in tests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use motash_core::{MotashError, Result, TaskState};
use serde::{Deserialize, Serialize};

use crate::source::{ScheduledTask, TaskFolder, TaskService, TaskSource};

/// On-disk snapshot layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    pub root: SnapshotFolder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFolder {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<SnapshotTask>,
    #[serde(default)]
    pub folders: Vec<SnapshotFolder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTask {
    pub name: String,
    /// Derived from the folder hierarchy when empty.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub state: TaskState,
    pub last_run: DateTime<Utc>,
    pub last_result: i32,
    #[serde(default)]
    pub description: Option<String>,
    /// Set by the exporter when the task's definition could not be read.
    #[serde(default)]
    pub read_error: Option<String>,
}

impl SnapshotTask {
    pub fn new(
        name: &str,
        path: &str,
        state: TaskState,
        last_run: DateTime<Utc>,
        last_result: i32,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            state,
            last_run,
            last_result,
            description: Some(description.to_string()),
            read_error: None,
        }
    }
}

impl SnapshotFolder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
            folders: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: SnapshotTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_folder(mut self, folder: SnapshotFolder) -> Self {
        self.folders.push(folder);
        self
    }

    /// Fill in missing task paths as `\Parent\Child\Task`.
    fn fill_paths(&mut self, folder_path: &str) {
        for task in &mut self.tasks {
            if task.path.is_empty() {
                task.path = format!("{folder_path}\\{}", task.name);
            }
        }
        for sub in &mut self.folders {
            let sub_path = format!("{folder_path}\\{}", sub.name);
            sub.fill_paths(&sub_path);
        }
    }
}

impl ScheduledTask for SnapshotTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn state(&self) -> Result<TaskState> {
        Ok(self.state)
    }

    fn last_run_time(&self) -> Result<DateTime<Utc>> {
        Ok(self.last_run)
    }

    fn last_task_result(&self) -> Result<i32> {
        Ok(self.last_result)
    }

    fn description(&self) -> Result<String> {
        match &self.read_error {
            Some(e) => Err(MotashError::task(e.clone())),
            None => Ok(self.description.clone().unwrap_or_default()),
        }
    }
}

impl TaskFolder for SnapshotFolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn subfolders(&self) -> Result<Vec<Box<dyn TaskFolder + '_>>> {
        Ok(self
            .folders
            .iter()
            .map(|f| Box::new(f) as Box<dyn TaskFolder + '_>)
            .collect())
    }

    fn tasks(&self) -> Result<Vec<Box<dyn ScheduledTask + '_>>> {
        Ok(self
            .tasks
            .iter()
            .map(|t| Box::new(t) as Box<dyn ScheduledTask + '_>)
            .collect())
    }
}

impl TaskFolder for &SnapshotFolder {
    fn name(&self) -> &str {
        (*self).name()
    }

    fn subfolders(&self) -> Result<Vec<Box<dyn TaskFolder + '_>>> {
        (*self).subfolders()
    }

    fn tasks(&self) -> Result<Vec<Box<dyn ScheduledTask + '_>>> {
        (*self).tasks()
    }
}

impl ScheduledTask for &SnapshotTask {
    fn name(&self) -> &str {
        (*self).name()
    }

    fn path(&self) -> &str {
        (*self).path()
    }

    fn state(&self) -> Result<TaskState> {
        (*self).state()
    }

    fn last_run_time(&self) -> Result<DateTime<Utc>> {
        (*self).last_run_time()
    }

    fn last_task_result(&self) -> Result<i32> {
        (*self).last_task_result()
    }

    fn description(&self) -> Result<String> {
        (*self).description()
    }
}

/// An open snapshot: the parsed tree and its export time.
pub struct SnapshotService {
    snapshot: SnapshotFile,
}

impl TaskService for SnapshotService {
    fn root_folder(&self) -> Result<Box<dyn TaskFolder + '_>> {
        Ok(Box::new(&self.snapshot.root))
    }

    fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.exported_at
    }
}

enum Origin {
    File(PathBuf),
    Memory(SnapshotFile),
}

/// Snapshot-backed [`TaskSource`].
pub struct SnapshotSource {
    origin: Origin,
}

impl SnapshotSource {
    /// Read the snapshot from `path` on every connect.
    pub fn from_file(path: &Path) -> Self {
        Self {
            origin: Origin::File(path.to_path_buf()),
        }
    }

    /// Serve an in-memory tree with no export time.
    pub fn from_root(mut root: SnapshotFolder) -> Self {
        root.fill_paths("");
        Self {
            origin: Origin::Memory(SnapshotFile {
                exported_at: None,
                root,
            }),
        }
    }

    /// Set the export time of an in-memory tree.
    pub fn exported_at(mut self, at: DateTime<Utc>) -> Self {
        if let Origin::Memory(file) = &mut self.origin {
            file.exported_at = Some(at);
        }
        self
    }

    /// Parse snapshot JSON.
    pub fn parse(json: &str) -> Result<SnapshotFile> {
        let mut file: SnapshotFile = serde_json::from_str(json)
            .map_err(|e| MotashError::scheduler(format!("Invalid snapshot: {e}")))?;
        match file.exported_at {
            Some(at) => tracing::debug!("Snapshot exported at {at}"),
            None => tracing::debug!("Snapshot has no export time"),
        }
        file.root.fill_paths("");
        Ok(file)
    }
}

impl TaskSource for SnapshotSource {
    fn connect(&self) -> Result<Box<dyn TaskService + '_>> {
        let snapshot = match &self.origin {
            Origin::File(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    MotashError::scheduler(format!("Cannot read snapshot {}: {e}", path.display()))
                })?;
                Self::parse(&json)?
            }
            Origin::Memory(file) => file.clone(),
        };
        Ok(Box::new(SnapshotService { snapshot }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "exported_at": "2026-02-22T09:00:00Z",
        "root": {
            "name": "\\",
            "tasks": [
                { "name": "Loose", "state": "idle", "last_run": "2026-02-22T08:00:00Z", "last_result": 0 }
            ],
            "folders": [
                {
                    "name": "Ops",
                    "tasks": [
                        {
                            "name": "Backup",
                            "state": "ready",
                            "last_run": "2026-02-22T08:30:00Z",
                            "last_result": 1,
                            "description": "Backup job {0,1}"
                        }
                    ],
                    "folders": [ { "name": "Nightly" } ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_fills_paths() {
        let file = SnapshotSource::parse(SAMPLE).unwrap();
        let root = &file.root;
        assert_eq!(root.tasks[0].path, "\\Loose");
        let ops = &root.folders[0];
        assert_eq!(ops.tasks[0].path, "\\Ops\\Backup");
        assert_eq!(ops.tasks[0].state, TaskState::Idle);
        assert_eq!(ops.folders[0].name, "Nightly");
    }

    #[test]
    fn test_scheduler_state_names() {
        let json = r#"{
            "root": {
                "name": "\\",
                "tasks": [
                    { "name": "Off", "state": "Disabled", "last_run": "2026-02-22T08:00:00Z", "last_result": 1 },
                    { "name": "Busy", "state": "Running", "last_run": "2026-02-22T08:00:00Z", "last_result": 267011 },
                    { "name": "Waiting", "state": "QUEUED", "last_run": "2026-02-22T08:00:00Z", "last_result": 0 }
                ]
            }
        }"#;
        let file = SnapshotSource::parse(json).unwrap();
        let states: Vec<TaskState> = file.root.tasks.iter().map(|t| t.state).collect();
        assert_eq!(states, vec![TaskState::Disabled, TaskState::Running, TaskState::Queued]);
        assert!(file.exported_at.is_none());
    }

    #[test]
    fn test_session_reports_export_time() {
        let at = "2026-02-22T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let source = SnapshotSource::from_root(SnapshotFolder::new("")).exported_at(at);
        assert_eq!(source.connect().unwrap().captured_at(), Some(at));

        let source = SnapshotSource::from_root(SnapshotFolder::new(""));
        assert_eq!(source.connect().unwrap().captured_at(), None);
    }

    #[test]
    fn test_invalid_json_is_scheduler_error() {
        let err = SnapshotSource::parse("{ not json").unwrap_err();
        assert!(matches!(err, MotashError::Scheduler(_)));
    }

    #[test]
    fn test_connect_missing_file_fails() {
        let source = SnapshotSource::from_file(Path::new("/nonexistent/motash/tasks.json"));
        assert!(source.connect().is_err());
    }

    #[test]
    fn test_connect_from_file() {
        let dir = std::env::temp_dir().join("motash-test-snapshot");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tasks.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = SnapshotSource::from_file(&path);
        let service = source.connect().unwrap();
        assert_eq!(
            service.captured_at(),
            Some("2026-02-22T09:00:00Z".parse::<DateTime<Utc>>().unwrap())
        );
        let root = service.root_folder().unwrap();
        assert_eq!(root.tasks().unwrap().len(), 1);
        let subs = root.subfolders().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name(), "Ops");
        let tasks = subs[0].tasks().unwrap();
        assert_eq!(tasks[0].description().unwrap(), "Backup job {0,1}");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_error_surfaces_on_description() {
        let mut task = SnapshotTask::new("T", "\\T", TaskState::Idle, Utc::now(), 0, "");
        task.read_error = Some("XML malformed".into());
        assert!(task.description().is_err());
        assert_eq!(task.last_task_result().unwrap(), 0);
    }
}
