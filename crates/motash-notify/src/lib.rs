//! # Motash Notify
//! Delivers audit failures to external channels.
//!
//! Notifiers are declared in the `[notify]` section of the config and
//! registered once at startup. Dispatch is sequential and best-effort:
//! ```text
//! NotificationDispatcher::notify(failures)
//!   ├── log       (tracing)
//!   ├── webhook   (HTTP POST, JSON)
//!   ├── telegram  (sendMessage)
//!   ├── discord   (webhook embed)
//!   └── email     (SMTP, STARTTLS)
//! ```

pub mod discord;
pub mod dispatcher;
pub mod email;
pub mod log;
pub mod message;
pub mod telegram;
pub mod webhook;

pub use dispatcher::NotificationDispatcher;
pub use message::ReportContext;
