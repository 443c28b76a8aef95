//! Log notifier: writes the report through `tracing`.

use async_trait::async_trait;
use motash_core::{Failure, Notifier, Result};

use crate::message::ReportContext;

pub struct LogNotifier {
    context: ReportContext,
}

impl LogNotifier {
    pub fn new(context: ReportContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, failures: &[Failure]) -> Result<()> {
        tracing::warn!("📋 {}", self.context.title(failures));
        for line in self.context.body(failures).lines() {
            tracing::warn!("  {line}");
        }
        Ok(())
    }
}
