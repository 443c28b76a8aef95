//! Shared text for notifier messages.

use motash_core::report::{DEFAULT_REPORT_FORMAT, failures_as_text, summary_line};
use motash_core::Failure;

/// Host name and line template shared by all notifiers of one run.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub host: String,
    pub template: String,
}

impl ReportContext {
    pub fn new(host: &str, template: &str) -> Self {
        Self {
            host: host.to_string(),
            template: template.to_string(),
        }
    }

    /// Use the local machine's host name.
    pub fn local(template: &str) -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "localhost".into());
        Self::new(&host, template)
    }

    pub fn title(&self, failures: &[Failure]) -> String {
        summary_line(failures, &self.host)
    }

    pub fn body(&self, failures: &[Failure]) -> String {
        failures_as_text(failures, &self.template)
    }
}

impl Default for ReportContext {
    fn default() -> Self {
        Self::local(DEFAULT_REPORT_FORMAT)
    }
}

/// Cut `text` to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
