use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub category: String,
    pub duration_sec: u64,
    pub distractions: u32,
    pub date: String,
    pub completed: bool,
}

impl Session {
    pub fn from_draft(draft: SessionDraft, id: String, at: DateTime<Local>) -> Self {
        Session {
            id,
            category: draft.category,
            duration_sec: draft.duration_sec,
            distractions: draft.distractions,
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            completed: draft.completed,
        }
    }

    pub fn local_day(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|at| at.with_timezone(&Local).date_naive())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDraft {
    pub category: String,
    pub duration_sec: u64,
    pub distractions: u32,
    pub completed: bool,
}

pub fn timestamp_id(millis: i64, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = millis;
    loop {
        let id = candidate.to_string();
        if !taken(&id) {
            return id;
        }
        candidate += 1;
    }
}

pub fn validate_category_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCategoryName);
    }
    Ok(name.to_string())
}

pub fn parse_minutes(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(minutes) if minutes > 0 && minutes <= u32::MAX / 60 => Ok(minutes),
        _ => Err(ValidationError::InvalidDuration(trimmed.to_string())),
    }
}

pub fn minutes_to_secs(minutes: u32) -> u32 {
    minutes * 60
}
