//! Homework bot - review status notifier
//!
//! Polls the Practicum homework API, detects review status changes, and sends
//! Telegram notifications.

pub mod config;
pub mod engine;
pub mod error;
pub mod homework;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod telegram;

pub use config::{load_config, Config};
pub use error::{BotError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::practicum::{HomeworkApi, PracticumClient};
use crate::telegram::TelegramNotifier;

/// Assembles a [`HomeworkBot`] from configuration and optional injected parts
pub struct HomeworkBotBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    api: Option<Arc<dyn HomeworkApi>>,
    notifier: Option<Arc<dyn Notifier>>,
    cancel: Option<CancellationToken>,
}

impl HomeworkBotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            api: None,
            notifier: None,
            cancel: None,
        }
    }

    /// Use this HTTP client for both the API and Telegram
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_api(mut self, api: Arc<dyn HomeworkApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Validate credentials and wire up the engine
    pub fn build(self) -> Result<HomeworkBot> {
        if !self.config.check_tokens() {
            return Err(BotError::MissingConfiguration(
                self.config.missing_tokens().join(", "),
            ));
        }

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new(self.config.request_timeout())?),
        };

        let api: Arc<dyn HomeworkApi> = match self.api {
            Some(api) => api,
            None => Arc::new(PracticumClient::new(&self.config, Arc::clone(&http))),
        };
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(TelegramNotifier::new(&self.config, Arc::clone(&http))),
        };
        let cancel = self.cancel.unwrap_or_else(CancellationToken::new);

        tracing::debug!(
            "Built homework bot: notifier={}, retry_interval={:?}",
            notifier.type_name(),
            self.config.retry_interval()
        );

        let engine = Engine::new(api, notifier, self.config.retry_interval(), cancel.clone());
        Ok(HomeworkBot { engine, cancel })
    }
}

/// A fully wired bot, ready to run
pub struct HomeworkBot {
    engine: Engine,
    cancel: CancellationToken,
}

impl HomeworkBot {
    /// Token that stops the bot when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the polling loop until ctrl-c or the cancellation token fires
    pub async fn start(self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => tracing::info!("Shutdown signal received"),
                        Err(e) => {
                            tracing::warn!("Failed to listen for ctrl-c: {}", e);
                            return;
                        }
                    }
                    cancel_for_signal.cancel();
                }
                _ = cancel_for_signal.cancelled() => {}
            }
        });

        tracing::info!("Homework bot started");
        self.engine.run().await;
        tracing::info!("Homework bot stopped");

        Ok(())
    }
}

/// Build and run the bot with the given configuration
pub async fn run(config: Config) -> Result<()> {
    HomeworkBotBuilder::new(config).build()?.start().await
}
