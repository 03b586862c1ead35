use crate::clock;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use time::{Duration, PrimitiveDateTime};
use tracing::{debug, warn};

time::serde::format_description!(
    scheduled_time_format,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

const TASK_ID_LEN: usize = 8;

/// Short random identifier, stable for the lifetime of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        let mut raw = uuid::Uuid::new_v4().simple().to_string();
        raw.truncate(TASK_ID_LEN);
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Urgency of a task. Only the exact strings `low`, `medium` and `high` are
/// known levels; anything else is kept verbatim as [`Priority::Unknown`] and
/// ranks below everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Unknown(String),
}

impl Priority {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// high = 3, medium = 2, low = 1, anything else = 0.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unknown(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(with = "scheduled_time_format")]
    pub scheduled_time: PrimitiveDateTime,
    #[serde(default)]
    pub is_completed: bool,
    /// Days between occurrences; zero means the task happens once.
    #[serde(default)]
    pub recurrence_days: u32,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        scheduled_time: PrimitiveDateTime,
    ) -> Self {
        Self {
            task_id: TaskId::generate(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            scheduled_time,
            is_completed: false,
            recurrence_days: 0,
            priority: Priority::default(),
        }
    }

    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_recurrence_days(mut self, recurrence_days: u32) -> Self {
        self.recurrence_days = recurrence_days;
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence_days > 0
    }

    /// Marks the task done. A recurring task hands back its next occurrence
    /// as a brand new pending task; this task itself is never moved forward.
    pub fn mark_complete(&mut self) -> Option<Task> {
        self.is_completed = true;

        if !self.is_recurring() {
            return None;
        }

        let Some(next_time) = self.get_next_occurrence() else {
            warn!(
                task_id = %self.task_id,
                recurrence_days = self.recurrence_days,
                "next occurrence falls outside the supported date range"
            );
            return None;
        };

        let successor = Task {
            task_id: TaskId::generate(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            scheduled_time: next_time,
            is_completed: false,
            recurrence_days: self.recurrence_days,
            priority: self.priority.clone(),
        };
        debug!(
            task_id = %self.task_id,
            successor_id = %successor.task_id,
            "recurring task rolled over"
        );
        Some(successor)
    }

    pub fn mark_incomplete(&mut self) {
        self.is_completed = false;
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(clock::local_now())
    }

    pub fn is_overdue_at(&self, now: PrimitiveDateTime) -> bool {
        !self.is_completed && self.scheduled_time < now
    }

    /// Same time of day, `recurrence_days` calendar days later.
    pub fn get_next_occurrence(&self) -> Option<PrimitiveDateTime> {
        if self.recurrence_days == 0 {
            return None;
        }
        self.scheduled_time
            .checked_add(Duration::days(i64::from(self.recurrence_days)))
    }
}
