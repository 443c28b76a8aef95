//! Error type shared by all Motash crates.

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, MotashError>;

#[derive(Error, Debug)]
pub enum MotashError {
    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The task scheduler source failed (connection, folder enumeration).
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// A single task's fields could not be read.
    #[error("Task error: {0}")]
    Task(String),

    /// A notifier failed to deliver.
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Watermark state could not be loaded or saved.
    #[error("State error: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl MotashError {
    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }

    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier(msg.into())
    }
}
