//! BDD step definitions for the polling loop

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use homework_bot::engine::{Engine, Iteration};
use homework_bot::notifier::Notifier;
use homework_bot::practicum::HomeworkApi;
use homework_bot::BotError;

use crate::world::HomeworkBotWorld;

/// A homework API that replays scripted responses, then reports no change
#[derive(Debug, Default)]
pub struct ScriptedApi {
    responses: RwLock<VecDeque<homework_bot::Result<Value>>>,
    pub cursors: Arc<RwLock<Vec<i64>>>,
}

impl ScriptedApi {
    pub fn new(
        responses: Vec<homework_bot::Result<Value>>,
        cursors: Arc<RwLock<Vec<i64>>>,
    ) -> Self {
        Self {
            responses: RwLock::new(responses.into()),
            cursors,
        }
    }
}

#[async_trait::async_trait]
impl HomeworkApi for ScriptedApi {
    async fn fetch(&self, from_date: i64) -> homework_bot::Result<Value> {
        self.cursors.write().await.push(from_date);
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"homeworks": []})))
    }
}

/// A notifier that records every delivery attempt
#[derive(Debug)]
pub struct RecordingNotifier {
    pub attempts: Arc<RwLock<Vec<String>>>,
    pub fail: bool,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, message: &str) -> homework_bot::Result<()> {
        self.attempts.write().await.push(message.to_string());
        if self.fail {
            Err(BotError::Notifier("chat not found".to_string()))
        } else {
            Ok(())
        }
    }
}

fn homework(name: &str, status: &str) -> Value {
    json!({
        "homeworks": [{"homework_name": name, "status": status}],
        "current_date": 1_700_000_000
    })
}

#[given("the API responds with an empty homework list")]
fn responds_empty(world: &mut HomeworkBotWorld) {
    world
        .scripted_responses
        .push(Ok(json!({"homeworks": [], "current_date": 1_700_000_000})));
}

#[given(expr = "the API responds with homework {string} in status {string}")]
fn responds_with_homework(world: &mut HomeworkBotWorld, name: String, status: String) {
    world.scripted_responses.push(Ok(homework(&name, &status)));
}

#[given(expr = "the API responds with {string}")]
fn responds_with_raw(world: &mut HomeworkBotWorld, json: String) {
    let value: Value = serde_json::from_str(&json).expect("invalid JSON in feature");
    world.scripted_responses.push(Ok(value));
}

#[given(expr = "the API responds with status code {int}")]
fn responds_with_status(world: &mut HomeworkBotWorld, status: u16) {
    world
        .scripted_responses
        .push(Err(BotError::EndpointUnavailable {
            status,
            reason: "Service Unavailable".to_string(),
            body: String::new(),
        }));
}

#[given("the API is unreachable")]
fn api_is_unreachable(world: &mut HomeworkBotWorld) {
    world.scripted_responses.push(Err(BotError::EndpointRequest {
        params: "from_date=0".to_string(),
        reason: "connection refused".to_string(),
    }));
}

#[given("the chat rejects messages")]
fn chat_rejects(world: &mut HomeworkBotWorld) {
    world.chat_rejects_messages = true;
}

#[when(expr = "the bot polls {int} time(s)")]
async fn bot_polls(world: &mut HomeworkBotWorld, times: usize) {
    let api = ScriptedApi::new(
        std::mem::take(&mut world.scripted_responses),
        Arc::clone(&world.fetch_cursors),
    );
    let notifier = RecordingNotifier {
        attempts: Arc::clone(&world.delivery_attempts),
        fail: world.chat_rejects_messages,
    };
    let engine = Engine::new(
        Arc::new(api),
        Arc::new(notifier),
        Duration::from_millis(10),
        CancellationToken::new(),
    );

    for _ in 0..times {
        let outcome = engine.poll_once(&mut world.loop_state).await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "{int} message(s) should have been sent")]
async fn messages_sent(world: &mut HomeworkBotWorld, count: usize) {
    let attempts = world.delivery_attempts.read().await;
    assert_eq!(attempts.len(), count, "sent: {:?}", *attempts);
}

#[then(expr = "message {int} should be {string}")]
async fn message_n_is(world: &mut HomeworkBotWorld, index: usize, expected: String) {
    let attempts = world.delivery_attempts.read().await;
    let message = attempts
        .get(index - 1)
        .unwrap_or_else(|| panic!("only {} messages sent", attempts.len()));
    assert_eq!(message, &expected);
}

#[then(expr = "message {int} should start with {string}")]
async fn message_n_starts_with(world: &mut HomeworkBotWorld, index: usize, prefix: String) {
    let attempts = world.delivery_attempts.read().await;
    let message = attempts
        .get(index - 1)
        .unwrap_or_else(|| panic!("only {} messages sent", attempts.len()));
    assert!(message.starts_with(&prefix), "{message}");
}

#[then(expr = "iteration {int} should report {word}")]
fn iteration_reports(world: &mut HomeworkBotWorld, index: usize, kind: String) {
    let outcome = world
        .outcomes
        .get(index - 1)
        .unwrap_or_else(|| panic!("only {} iterations ran", world.outcomes.len()));
    let actual = match outcome {
        Iteration::NoChange => "no-change",
        Iteration::StatusChanged(_) => "change",
        Iteration::Failed(_) => "failure",
    };
    assert_eq!(actual, kind, "{outcome:?}");
}

#[then("the cursor should not have moved")]
fn cursor_not_moved(world: &mut HomeworkBotWorld) {
    assert_eq!(world.loop_state.cursor, 0);
}

#[then("the cursor should have advanced")]
fn cursor_advanced(world: &mut HomeworkBotWorld) {
    assert!(world.loop_state.cursor > 0, "{:?}", world.loop_state);
}

#[then(expr = "fetch {int} should have started from the beginning")]
async fn fetch_from_beginning(world: &mut HomeworkBotWorld, index: usize) {
    let cursors = world.fetch_cursors.read().await;
    assert_eq!(cursors.get(index - 1), Some(&0), "cursors: {:?}", *cursors);
}

#[then(expr = "fetch {int} should have started after the previous fetch")]
async fn fetch_after_previous(world: &mut HomeworkBotWorld, index: usize) {
    let cursors = world.fetch_cursors.read().await;
    let cursor = cursors
        .get(index - 1)
        .unwrap_or_else(|| panic!("only {} fetches ran", cursors.len()));
    assert!(*cursor > 0, "cursors: {:?}", *cursors);
}

#[then("the failure notice flag should be set")]
fn flag_set(world: &mut HomeworkBotWorld) {
    assert!(world.loop_state.error_notified);
}

#[then("the failure notice flag should be clear")]
fn flag_clear(world: &mut HomeworkBotWorld) {
    assert!(!world.loop_state.error_notified);
}
