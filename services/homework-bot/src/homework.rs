//! Homework statuses, response validation and message formatting

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::BotError;

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const NAME_KEY: &str = "homework_name";
pub const STATUS_KEY: &str = "status";

/// Review status of a homework submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Status code as reported by the API
    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| BotError::UnknownStatus {
                status: s.to_string(),
                known: Self::ALL.iter().map(|s| s.code().to_string()).collect(),
            })
    }
}

fn found_keys(object: &serde_json::Map<String, Value>) -> Vec<String> {
    object.keys().cloned().collect()
}

/// Validate an API response and return its homework records, newest first
pub fn check_response(response: &Value) -> crate::Result<Vec<Value>> {
    let object = response.as_object().ok_or_else(|| {
        BotError::ResponseType(format!("got {}", json_type_name(response)))
    })?;

    if object.is_empty() {
        return Err(BotError::EmptyData);
    }

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or_else(|| BotError::MissingKey {
            key: HOMEWORKS_KEY.to_string(),
            found: found_keys(object),
        })?;

    match homeworks {
        Value::Array(list) => Ok(list.clone()),
        _ => Err(BotError::HomeworkType),
    }
}

/// Build the chat message for a single homework record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let object = homework.as_object().ok_or_else(|| {
        BotError::ResponseType(format!("homework record is {}", json_type_name(homework)))
    })?;

    let field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| BotError::MissingKey {
                key: key.to_string(),
                found: found_keys(object),
            })
    };

    let name = field(NAME_KEY)?;
    let status: HomeworkStatus = field(STATUS_KEY)?.parse()?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
