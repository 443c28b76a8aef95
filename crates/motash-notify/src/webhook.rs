//! Generic HTTP webhook: POSTs the failures as JSON.

use async_trait::async_trait;
use motash_core::config::WebhookNotifyConfig;
use motash_core::{Failure, MotashError, Notifier, Result};

use crate::message::ReportContext;

pub struct WebhookNotifier {
    url: String,
    headers: Vec<(String, String)>,
    context: ReportContext,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: &WebhookNotifyConfig, context: ReportContext) -> Self {
        Self {
            url: config.url.clone(),
            headers: config.headers.clone(),
            context,
            client: reqwest::Client::new(),
        }
    }

    fn payload(&self, failures: &[Failure]) -> serde_json::Value {
        serde_json::json!({
            "title": self.context.title(failures),
            "host": self.context.host,
            "count": failures.len(),
            "text": self.context.body(failures),
            "failures": failures,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, failures: &[Failure]) -> Result<()> {
        let mut req = self
            .client
            .post(&self.url)
            .json(&self.payload(failures))
            .timeout(std::time::Duration::from_secs(10));

        for (key, value) in &self.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| MotashError::notifier(format!("Webhook send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Webhook notification sent to {}", self.url);
            Ok(())
        } else {
            Err(MotashError::notifier(format!("Webhook error {}", resp.status())))
        }
    }
}
