//! # Motash Audit
//!
//! Walks the task scheduler's folder tree and collects tasks whose last run
//! ended with a result code they do not allow.
//!
//! ## Architecture
//! ```text
//! AuditEngine::check()
//!   ├── preconditions: OS version, scheduler service, RootFolderPattern
//!   ├── TaskSource::connect() → TaskService (released on drop)
//!   ├── root tasks (only with CheckRootTasks)
//!   └── FolderWalker
//!         ├── first level: folders matching RootFolderPattern
//!         ├── below a match: everything
//!         └── TaskEvaluator → AllowedResults::from_description
//! ```

pub mod engine;
pub mod evaluator;
pub mod host;
pub mod result_codes;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod walker;

pub use engine::{AuditEngine, AuditSettings};
pub use evaluator::TaskEvaluator;
pub use host::{Environment, HostEnvironment, StaticEnvironment};
pub use result_codes::{AllowedResults, SCHED_S_TASK_RUNNING};
pub use snapshot::{SnapshotFolder, SnapshotSource, SnapshotTask};
pub use source::{ScheduledTask, TaskFolder, TaskService, TaskSource};
pub use state::WatermarkStore;
pub use walker::FolderWalker;
