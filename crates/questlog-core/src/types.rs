// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records shared by storage, services, and the HTTP surface.
//!
//! JSON field names are camelCase and timestamps are RFC 3339 UTC strings with
//! millisecond precision, which is the wire shape clients already consume.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Starting values for a freshly created profile.
pub const INITIAL_XP: i64 = 0;
pub const INITIAL_LEVEL: i64 = 1;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A user profile with progress counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_index: i64,
    pub xp: i64,
    pub level: i64,
    pub hydration_progress: i64,
    pub medication_progress: i64,
    pub achievements: Option<serde_json::Value>,
    pub cards: Option<serde_json::Value>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new profile with a generated id and default progress fields.
    pub fn new(name: String, avatar_index: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            avatar_index,
            xp: INITIAL_XP,
            level: INITIAL_LEVEL,
            hydration_progress: 0,
            medication_progress: 0,
            achievements: None,
            cards: None,
            created_at: now,
        }
    }
}

/// A user together with every task they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub tasks: Vec<Task>,
}

/// A habit or to-do item owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub user_id: String,
    #[serde(with = "timestamp::option")]
    pub due_time: Option<DateTime<Utc>>,
    /// Weekday labels. Empty for a one-off task.
    pub repeat_days: Vec<String>,
    #[serde(with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new, not yet completed task with a generated id.
    pub fn new(
        title: String,
        user_id: String,
        due_time: Option<DateTime<Utc>>,
        repeat_days: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            user_id,
            due_time,
            repeat_days,
            completed_at: None,
            created_at: now,
        }
    }

    /// A task is repeating when it names at least one weekday.
    pub fn is_repeating(&self) -> bool {
        !self.repeat_days.is_empty()
    }
}

/// A conditional completion write for one task.
///
/// The write only lands if the task's stored `completed_at` still equals
/// `expected_completed_at`. The XP award, if any, is applied to the owning
/// user in the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionUpdate {
    pub task_id: String,
    pub expected_completed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub xp_award: i64,
}

/// Outcome of a [`CompletionUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionWrite {
    /// The write landed; carries the task as stored afterwards.
    Applied(Task),
    /// The task changed since it was read; nothing was written.
    Stale,
    /// The task no longer exists.
    Missing,
}

/// Formats a timestamp the way every Questlog record is serialized and stored.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// The current instant, truncated to the millisecond precision records are stored with.
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Serde adapters for millisecond RFC 3339 timestamps.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_str(&super::super::format_timestamp(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::super::parse_timestamp(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn new_user_has_default_progress() {
        let user = User::new("Ann".to_string(), 2, fixed_now());
        assert_eq!(user.xp, 0);
        assert_eq!(user.level, 1);
        assert_eq!(user.hydration_progress, 0);
        assert_eq!(user.medication_progress, 0);
        assert!(user.achievements.is_none());
        assert!(user.cards.is_none());
        assert!(!user.id.is_empty());
    }

    #[test]
    fn user_serializes_camel_case_with_null_collections() {
        let user = User::new("Ann".to_string(), 2, fixed_now());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["avatarIndex"], 2);
        assert_eq!(json["hydrationProgress"], 0);
        assert_eq!(json["medicationProgress"], 0);
        assert!(json["achievements"].is_null());
        assert!(json["cards"].is_null());
        assert_eq!(json["createdAt"], "2026-03-02T09:30:00.000Z");
    }

    #[test]
    fn task_serializes_null_completion_and_empty_repeat_days() {
        let task = Task::new(
            "Stretch".to_string(),
            "user-1".to_string(),
            None,
            Vec::new(),
            fixed_now(),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert!(json["completedAt"].is_null());
        assert!(json["dueTime"].is_null());
        assert_eq!(json["repeatDays"], serde_json::json!([]));
        assert_eq!(json["userId"], "user-1");
        assert!(!task.is_repeating());
    }

    #[test]
    fn profile_flattens_user_fields_next_to_tasks() {
        let user = User::new("Ann".to_string(), 2, fixed_now());
        let task = Task::new(
            "Drink water".to_string(),
            user.id.clone(),
            None,
            vec!["Mon".to_string()],
            fixed_now(),
        );
        let profile = UserProfile {
            user: user.clone(),
            tasks: vec![task],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], user.id.as_str());
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["tasks"][0]["title"], "Drink water");
    }

    #[test]
    fn timestamps_keep_millisecond_precision() {
        let ts = Utc.timestamp_millis_opt(1_772_443_800_123).unwrap();
        let formatted = format_timestamp(&ts);
        assert!(formatted.ends_with(".123Z"), "got {formatted}");
        assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
    }

    #[test]
    fn current_timestamp_survives_formatting() {
        let now = current_timestamp();
        assert_eq!(parse_timestamp(&format_timestamp(&now)).unwrap(), now);
    }
}
