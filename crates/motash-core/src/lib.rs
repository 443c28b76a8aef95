//! # Motash Core
//!
//! Shared building blocks for the scheduled-task auditor: the failure model,
//! configuration, error type, the notifier capability and report rendering.

pub mod config;
pub mod error;
pub mod report;
pub mod traits;
pub mod types;

pub use config::MotashConfig;
pub use error::{MotashError, Result};
pub use traits::Notifier;
pub use types::{Failure, TaskState};
