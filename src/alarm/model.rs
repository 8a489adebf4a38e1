use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One scheduled alarm. Identity is its position in the registry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "hours", alias = "hour")]
    pub hour: u32,
    #[serde(rename = "minutes", alias = "minute")]
    pub minute: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Alarm {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            minute,
            active: true,
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AlarmInputError {
    #[error("no alarm time entered")]
    Empty,
    #[error("alarm time {hour:02}:{minute:02} is out of range")]
    OutOfRange { hour: u32, minute: u32 },
}

/// Parses an `HH:MM` field. Parts that are not numbers count as 0, a missing
/// minute part counts as 0 and anything after the minute is ignored.
pub fn parse_alarm_input(input: &str) -> Result<(u32, u32), AlarmInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AlarmInputError::Empty);
    }

    let mut parts = trimmed.split(':');
    let hour = parse_component(parts.next());
    let minute = parse_component(parts.next());
    if hour > 23 || minute > 59 {
        return Err(AlarmInputError::OutOfRange { hour, minute });
    }
    Ok((hour, minute))
}

fn parse_component(part: Option<&str>) -> u32 {
    part.and_then(|text| text.trim().parse().ok()).unwrap_or(0)
}

pub fn parse_alarm_list(content: &str) -> Result<Vec<Alarm>> {
    serde_json::from_str::<Vec<Alarm>>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })
}

pub fn serialize_alarm_list(alarms: &[Alarm]) -> Result<String> {
    serde_json::to_string(alarms).context("unable to serialize alarm list")
}
