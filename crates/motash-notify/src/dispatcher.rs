//! Notifier registry and sequential, best-effort dispatch.

use motash_core::config::NotifyConfig;
use motash_core::{Failure, Notifier, Result};

use crate::discord::DiscordNotifier;
use crate::email::EmailNotifier;
use crate::log::LogNotifier;
use crate::message::ReportContext;
use crate::telegram::TelegramNotifier;
use crate::webhook::WebhookNotifier;

/// Registered notifiers, invoked in registration order.
pub struct NotificationDispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Build the registry from the `[notify]` config section.
    /// Called once at startup.
    pub fn from_config(config: &NotifyConfig, context: &ReportContext) -> Self {
        let mut dispatcher = Self::new();

        if let Some(log) = &config.log
            && log.enabled
        {
            dispatcher.register(Box::new(LogNotifier::new(context.clone())));
        }

        if let Some(wh) = &config.webhook
            && wh.enabled
            && !wh.url.is_empty()
        {
            dispatcher.register(Box::new(WebhookNotifier::new(wh, context.clone())));
        }

        if let Some(tg) = &config.telegram
            && tg.enabled
        {
            match TelegramNotifier::from_config(tg, context.clone()) {
                Some(notifier) => dispatcher.register(Box::new(notifier)),
                None => tracing::warn!("⚠️ Telegram notifier enabled but bot token or chat id missing"),
            }
        }

        if let Some(dc) = &config.discord
            && dc.enabled
            && !dc.webhook_url.is_empty()
        {
            dispatcher.register(Box::new(DiscordNotifier::new(dc, context.clone())));
        }

        if let Some(em) = &config.email
            && em.enabled
            && !em.smtp_host.is_empty()
        {
            dispatcher.register(Box::new(EmailNotifier::new(em, context.clone())));
        }

        dispatcher
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        tracing::debug!("🔔 Registered notifier: {}", notifier.name());
        self.notifiers.push(notifier);
    }

    pub fn names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Send to every notifier in turn. Returns (notifier name, outcome).
    pub async fn dispatch_all(&self, failures: &[Failure]) -> Vec<(String, Result<()>)> {
        let mut results = Vec::new();
        for notifier in &self.notifiers {
            let result = notifier.send(failures).await;
            results.push((notifier.name().to_string(), result));
        }
        results
    }

    /// Send the failures to all notifiers and return how many were invoked.
    /// Does nothing when there are no failures. Errors are logged only.
    pub async fn notify(&self, failures: &[Failure]) -> usize {
        if failures.is_empty() {
            return 0;
        }

        let results = self.dispatch_all(failures).await;
        for (name, result) in &results {
            if let Err(e) = result {
                tracing::warn!("⚠️ Notifier '{name}' failed: {e}");
            }
        }
        results.len()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
