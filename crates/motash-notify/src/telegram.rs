//! Telegram Bot API notifier — `sendMessage` to one chat.

use async_trait::async_trait;
use motash_core::config::TelegramNotifyConfig;
use motash_core::{Failure, MotashError, Notifier, Result};

use crate::message::{ReportContext, truncate};

/// Used when the config leaves `chat_id` empty.
pub const CHAT_ID_ENV: &str = "MOTASH_NOTIFY_TELEGRAM_CHAT_ID";

/// Telegram caps messages at 4096 characters.
const MAX_TEXT: usize = 4000;

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    context: ReportContext,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Returns `None` when no chat id is configured or set in the environment.
    pub fn from_config(config: &TelegramNotifyConfig, context: ReportContext) -> Option<Self> {
        let chat_id = if config.chat_id.is_empty() {
            std::env::var(CHAT_ID_ENV).unwrap_or_default()
        } else {
            config.chat_id.clone()
        };
        if chat_id.is_empty() || config.bot_token.is_empty() {
            return None;
        }
        Some(Self {
            bot_token: config.bot_token.clone(),
            chat_id,
            context,
            client: reqwest::Client::new(),
        })
    }

    fn text(&self, failures: &[Failure]) -> String {
        let text = format!(
            "🚨 *{}*\n\n{}",
            escape_markdown(&self.context.title(failures)),
            escape_markdown(&self.context.body(failures)),
        );
        truncate(&text, MAX_TEXT)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, failures: &[Failure]) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": self.text(failures),
                "parse_mode": "Markdown"
            }))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| MotashError::notifier(format!("Telegram send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Telegram notification sent to chat {}", self.chat_id);
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(MotashError::notifier(format!("Telegram API error {status}: {body}")))
        }
    }
}

/// Escape Telegram MarkdownV1 special characters.
fn escape_markdown(s: &str) -> String {
    s.replace('_', "\\_")
        .replace('*', "\\*")
        .replace('[', "\\[")
        .replace('`', "\\`")
}
