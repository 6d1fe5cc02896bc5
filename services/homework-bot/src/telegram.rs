//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::io::HttpClient;
use crate::notifier::Notifier;

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct TelegramApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram notification sender bound to one chat
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let token = config.telegram_token.as_deref().unwrap_or_default();
        let chat_id = config.telegram_chat_id.clone().unwrap_or_default();

        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_url.trim_end_matches('/'),
                token
            ),
            chat_id,
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, message: &str) -> crate::Result<()> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        });

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self.http.post_json(&self.send_url, &body).await?;

        let parsed = serde_json::from_str::<TelegramApiResponse>(&response.body).ok();
        if response.status != 200 || !parsed.as_ref().is_some_and(|p| p.ok) {
            let description = parsed
                .and_then(|p| p.description)
                .unwrap_or(response.body);
            return Err(crate::BotError::Notifier(format!(
                "Telegram API returned status {}: {}",
                response.status, description
            )));
        }

        tracing::debug!("Telegram message sent successfully");
        Ok(())
    }
}
