// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request body parsing.
//!
//! Each route's loosely-typed JSON body is converted into a typed parameter
//! struct before any service logic runs. Rejections carry the client-facing
//! message for the route.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use questlog_core::QuestlogError;
use serde_json::Value;

const INVALID_AVATAR_BODY: &str = "Invalid request body";
const INVALID_PROFILE_BODY: &str = "Invalid name or avatarIndex";
const MISSING_TASK_FIELDS: &str = "Missing required fields";
const INVALID_TIME: &str = "Invalid time";
const INVALID_REPEAT_DAYS: &str = "Invalid repeatDays";

/// Parameters for `POST /api/profile/avatar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpdate {
    pub id: String,
    pub avatar_index: i64,
}

impl AvatarUpdate {
    pub fn from_json(body: &Value) -> Result<Self, QuestlogError> {
        let invalid = || QuestlogError::InvalidRequest(INVALID_AVATAR_BODY.to_string());
        Ok(Self {
            id: non_empty_string(body, "id").ok_or_else(invalid)?,
            avatar_index: integer(body, "avatarIndex").ok_or_else(invalid)?,
        })
    }
}

/// Parameters for `POST /api/profile/create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub avatar_index: i64,
}

impl NewProfile {
    pub fn from_json(body: &Value) -> Result<Self, QuestlogError> {
        let invalid = || QuestlogError::InvalidRequest(INVALID_PROFILE_BODY.to_string());
        Ok(Self {
            name: non_empty_string(body, "name").ok_or_else(invalid)?,
            avatar_index: integer(body, "avatarIndex").ok_or_else(invalid)?,
        })
    }
}

/// Parameters for `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub user_id: String,
    pub due_time: Option<DateTime<Utc>>,
    /// Empty when the body omits `repeatDays` or sends `null`.
    pub repeat_days: Vec<String>,
}

impl NewTask {
    pub fn from_json(body: &Value) -> Result<Self, QuestlogError> {
        let missing = || QuestlogError::InvalidRequest(MISSING_TASK_FIELDS.to_string());
        let title = non_empty_string(body, "title").ok_or_else(missing)?;
        let user_id = non_empty_string(body, "userId").ok_or_else(missing)?;

        let due_time = match body.get("time") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) if raw.is_empty() => None,
            Some(Value::String(raw)) => Some(
                parse_due_time(raw)
                    .ok_or_else(|| QuestlogError::InvalidRequest(INVALID_TIME.to_string()))?,
            ),
            Some(_) => return Err(QuestlogError::InvalidRequest(INVALID_TIME.to_string())),
        };

        let repeat_days = match body.get("repeatDays") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| QuestlogError::InvalidRequest(INVALID_REPEAT_DAYS.to_string()))?,
            Some(_) => {
                return Err(QuestlogError::InvalidRequest(INVALID_REPEAT_DAYS.to_string()));
            }
        };

        Ok(Self {
            title,
            user_id,
            due_time,
            repeat_days,
        })
    }
}

fn non_empty_string(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts integral JSON numbers, including floats with no fractional part (`2.0`).
fn integer(body: &Value, key: &str) -> Option<i64> {
    let value = body.get(key)?;
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Parses a due time.
///
/// Accepts RFC 3339, a date-time without offset (read as UTC), or a bare
/// `YYYY-MM-DD` date (midnight UTC). The UTC result must fall in years
/// 0000..=9999, the range stored timestamps can represent.
pub fn parse_due_time(raw: &str) -> Option<DateTime<Utc>> {
    parse_any_due_time(raw).filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_any_due_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn message(err: QuestlogError) -> String {
        match err {
            QuestlogError::InvalidRequest(msg) => msg,
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn avatar_update_requires_id_and_integer_index() {
        let parsed = AvatarUpdate::from_json(&json!({"id": "u1", "avatarIndex": 4})).unwrap();
        assert_eq!(parsed.id, "u1");
        assert_eq!(parsed.avatar_index, 4);

        for body in [
            json!({"avatarIndex": 4}),
            json!({"id": "", "avatarIndex": 4}),
            json!({"id": "u1", "avatarIndex": "4"}),
            json!({"id": "u1", "avatarIndex": 1.5}),
            json!({"id": "u1"}),
            json!([1, 2]),
        ] {
            let err = AvatarUpdate::from_json(&body).unwrap_err();
            assert_eq!(message(err), "Invalid request body", "body: {body}");
        }
    }

    #[test]
    fn whole_float_avatar_index_is_accepted() {
        let parsed = NewProfile::from_json(&json!({"name": "Ann", "avatarIndex": 2.0})).unwrap();
        assert_eq!(parsed.avatar_index, 2);
    }

    #[test]
    fn new_profile_rejects_missing_name_or_non_numeric_index() {
        for body in [
            json!({"avatarIndex": 2}),
            json!({"name": "Ann", "avatarIndex": "two"}),
            json!({"name": 7, "avatarIndex": 2}),
            json!({"name": "Ann", "avatarIndex": null}),
        ] {
            let err = NewProfile::from_json(&body).unwrap_err();
            assert_eq!(message(err), "Invalid name or avatarIndex", "body: {body}");
        }
    }

    #[test]
    fn new_task_minimal_body() {
        let parsed = NewTask::from_json(&json!({"title": "Stretch", "userId": "u1"})).unwrap();
        assert_eq!(parsed.title, "Stretch");
        assert_eq!(parsed.user_id, "u1");
        assert!(parsed.due_time.is_none());
        assert!(parsed.repeat_days.is_empty());
    }

    #[test]
    fn new_task_with_schedule() {
        let parsed = NewTask::from_json(&json!({
            "title": "Drink water",
            "userId": "u1",
            "time": "2026-03-02T08:00:00.000Z",
            "repeatDays": ["Mon", "Tue"],
        }))
        .unwrap();
        assert_eq!(
            parsed.due_time,
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap())
        );
        assert_eq!(parsed.repeat_days, vec!["Mon".to_string(), "Tue".to_string()]);
    }

    #[test]
    fn new_task_missing_required_fields() {
        for body in [
            json!({"userId": "u1"}),
            json!({"title": "", "userId": "u1"}),
            json!({"title": "Stretch"}),
            json!({"title": "Stretch", "userId": ""}),
        ] {
            let err = NewTask::from_json(&body).unwrap_err();
            assert_eq!(message(err), "Missing required fields", "body: {body}");
        }
    }

    #[test]
    fn new_task_empty_time_means_no_due_time() {
        let parsed =
            NewTask::from_json(&json!({"title": "Stretch", "userId": "u1", "time": ""})).unwrap();
        assert!(parsed.due_time.is_none());
    }

    #[test]
    fn new_task_rejects_bad_time_and_repeat_days() {
        let bad_time = NewTask::from_json(&json!({"title": "t", "userId": "u", "time": "soon"}));
        assert_eq!(message(bad_time.unwrap_err()), "Invalid time");

        let numeric_time = NewTask::from_json(&json!({"title": "t", "userId": "u", "time": 5}));
        assert_eq!(message(numeric_time.unwrap_err()), "Invalid time");

        let bad_days =
            NewTask::from_json(&json!({"title": "t", "userId": "u", "repeatDays": ["Mon", 2]}));
        assert_eq!(message(bad_days.unwrap_err()), "Invalid repeatDays");

        let not_array =
            NewTask::from_json(&json!({"title": "t", "userId": "u", "repeatDays": "Mon"}));
        assert_eq!(message(not_array.unwrap_err()), "Invalid repeatDays");
    }

    #[test]
    fn parse_due_time_accepts_common_shapes() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap();
        assert_eq!(parse_due_time("2026-03-02T08:30:00Z"), Some(expected));
        assert_eq!(parse_due_time("2026-03-02T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_due_time("2026-03-02T08:30:00"), Some(expected));
        assert_eq!(parse_due_time("2026-03-02T08:30"), Some(expected));
        assert_eq!(
            parse_due_time("2026-03-02"),
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_due_time("02/03/2026"), None);
    }

    #[test]
    fn parse_due_time_rejects_years_outside_four_digits() {
        assert_eq!(parse_due_time("+10000-01-01"), None);
        assert_eq!(parse_due_time("+10000-01-01T08:00:00"), None);
        assert_eq!(parse_due_time("-0001-06-01"), None);
        assert_eq!(parse_due_time("9999-12-31T23:00:00-05:00"), None);
        assert_eq!(
            parse_due_time("9999-12-31"),
            Some(Utc.with_ymd_and_hms(9999, 12, 31, 0, 0, 0).unwrap())
        );

        let err =
            NewTask::from_json(&json!({"title": "t", "userId": "u", "time": "+10000-01-01"}))
                .unwrap_err();
        assert_eq!(message(err), "Invalid time");
    }
}
