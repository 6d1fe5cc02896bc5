//! Engine: polls the homework API and dispatches chat notifications

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::homework::{check_response, parse_status};
use crate::notifier::Notifier;
use crate::practicum::HomeworkApi;
use crate::BotError;

pub const NO_CHANGE_MESSAGE: &str = "Статус домашней работы не изменен.";
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// State carried between loop iterations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopState {
    /// Lower bound (epoch seconds) for the next fetch
    pub cursor: i64,
    /// Whether a failure notice was already sent for the current failure run
    pub error_notified: bool,
}

/// Outcome of a single polling iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Iteration {
    NoChange,
    StatusChanged(String),
    Failed(String),
}

/// The engine runs the fetch, validate, notify, sleep cycle
pub struct Engine {
    api: Arc<dyn HomeworkApi>,
    notifier: Arc<dyn Notifier>,
    retry_interval: Duration,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        notifier: Arc<dyn Notifier>,
        retry_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            notifier,
            retry_interval,
            cancel,
        }
    }

    /// Poll until the cancellation token is triggered
    pub async fn run(&self) {
        let mut state = LoopState::default();

        loop {
            let outcome = self.poll_once(&mut state).await;
            tracing::debug!(
                "Iteration finished: {:?} (cursor={}, error_notified={})",
                outcome,
                state.cursor,
                state.error_notified
            );

            tokio::select! {
                _ = tokio::time::sleep(self.retry_interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one fetch/validate/notify iteration, updating `state`
    pub async fn poll_once(&self, state: &mut LoopState) -> Iteration {
        match self.check_for_update(state).await {
            Ok(None) => {
                tracing::info!("{}", NO_CHANGE_MESSAGE);
                state.error_notified = false;
                Iteration::NoChange
            }
            Ok(Some(message)) => {
                state.error_notified = false;
                // Delivery failures are already logged by send_message
                let _ = self.send_message(&message).await;
                Iteration::StatusChanged(message)
            }
            Err(e) => {
                let message = format!("{}: {}", FAILURE_PREFIX, e);
                tracing::error!("{}", message);
                if state.error_notified {
                    tracing::debug!("Failure notice already sent, not repeating it");
                } else {
                    let _ = self.send_message(&message).await;
                    state.error_notified = true;
                }
                Iteration::Failed(message)
            }
        }
    }

    async fn check_for_update(&self, state: &mut LoopState) -> crate::Result<Option<String>> {
        let response = self.api.fetch(state.cursor).await?;
        state.cursor = current_epoch_secs();

        let homeworks = check_response(&response)?;
        match homeworks.first() {
            Some(latest) => parse_status(latest).map(Some),
            None => Ok(None),
        }
    }

    /// Deliver a message to the chat, logging the outcome
    pub async fn send_message(&self, message: &str) -> crate::Result<()> {
        match self.notifier.notify(message).await {
            Ok(()) => {
                tracing::info!("Bot sent message to chat: \"{}\"", message);
                Ok(())
            }
            Err(e) => {
                let err = BotError::SendMessage {
                    message: message.to_string(),
                    reason: e.to_string(),
                };
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }
}

fn current_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
