//! Discord webhook notifier — one embed per run.

use async_trait::async_trait;
use motash_core::config::DiscordNotifyConfig;
use motash_core::{Failure, MotashError, Notifier, Result};

use crate::message::{ReportContext, truncate};

/// Discord caps embed descriptions at 4096 characters.
const MAX_DESCRIPTION: usize = 4000;

const COLOR_FAILURE: u32 = 0xFF0000; // Red
const COLOR_SETUP: u32 = 0xFF8800; // Orange

pub struct DiscordNotifier {
    webhook_url: String,
    context: ReportContext,
    client: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new(config: &DiscordNotifyConfig, context: ReportContext) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            context,
            client: reqwest::Client::new(),
        }
    }

    fn embed(&self, failures: &[Failure]) -> serde_json::Value {
        let color = if failures.iter().all(Failure::is_synthetic) {
            COLOR_SETUP
        } else {
            COLOR_FAILURE
        };
        serde_json::json!({
            "embeds": [{
                "title": self.context.title(failures),
                "description": truncate(&self.context.body(failures), MAX_DESCRIPTION),
                "color": color,
                "footer": { "text": format!("Host: {}", self.context.host) }
            }]
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send(&self, failures: &[Failure]) -> Result<()> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&self.embed(failures))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| MotashError::notifier(format!("Discord send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Discord notification sent");
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(MotashError::notifier(format!("Discord webhook error {status}: {body}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notifier() -> DiscordNotifier {
        let config = DiscordNotifyConfig {
            enabled: true,
            webhook_url: "https://discord.com/api/webhooks/1/x".into(),
        };
        DiscordNotifier::new(&config, ReportContext::new("srv01", "{path} ({result})"))
    }

    #[test]
    fn test_embed_colors() {
        let n = notifier();
        let setup = vec![Failure::setup_problem("service down")];
        assert_eq!(n.embed(&setup)["embeds"][0]["color"], COLOR_SETUP);

        let task = vec![Failure::new("Backup", "\\Ops\\Backup", Utc::now(), 5)];
        let embed = n.embed(&task);
        assert_eq!(embed["embeds"][0]["color"], COLOR_FAILURE);
        assert_eq!(embed["embeds"][0]["description"], "\\Ops\\Backup (5)\n");
        assert_eq!(embed["embeds"][0]["footer"]["text"], "Host: srv01");
    }

    #[test]
    fn test_unreadable_task_is_a_task_failure() {
        let n = notifier();
        let task = vec![Failure::new(
            "Ghost",
            "\\Ops\\Ghost",
            Utc::now(),
            motash_core::types::APP_EXCEPTION_CODE,
        )];
        assert_eq!(n.embed(&task)["embeds"][0]["color"], COLOR_FAILURE);

        let crash = vec![Failure::application_exception("access is denied")];
        assert_eq!(n.embed(&crash)["embeds"][0]["color"], COLOR_SETUP);
    }
}
