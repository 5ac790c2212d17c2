// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task CRUD operations and the transactional completion write.

use questlog_core::QuestlogError;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::database::{Database, map_tr_err};
use crate::models::{CompletionUpdate, CompletionWrite, Task};
use crate::queries::{optional_timestamp_column, timestamp_column, timestamp_text, users};

const TASK_COLUMNS: &str = "id, title, user_id, due_time, repeat_days, completed_at, created_at";

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let repeat_days: String = row.get(4)?;
    let repeat_days = serde_json::from_str(&repeat_days)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        user_id: row.get(2)?,
        due_time: optional_timestamp_column(row, 3)?,
        repeat_days,
        completed_at: optional_timestamp_column(row, 5)?,
        created_at: timestamp_column(row, 6)?,
    })
}

fn select_task(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<Task>> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        task_from_row,
    )
    .optional()
}

/// Insert a new task. Fails with a constraint error if the owner does not exist.
pub async fn create_task(db: &Database, task: &Task) -> Result<(), QuestlogError> {
    let task = task.clone();
    let repeat_days = serde_json::to_string(&task.repeat_days).map_err(QuestlogError::storage)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO tasks (id, title, user_id, due_time, repeat_days, completed_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.id,
                    task.title,
                    task.user_id,
                    task.due_time.as_ref().map(timestamp_text),
                    repeat_days,
                    task.completed_at.as_ref().map(timestamp_text),
                    timestamp_text(&task.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a task by ID.
pub async fn get_task(db: &Database, id: &str) -> Result<Option<Task>, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| select_task(conn, &id))
        .await
        .map_err(map_tr_err)
}

/// List every task owned by a user, in creation order.
pub async fn list_tasks_for_user(db: &Database, user_id: &str) -> Result<Vec<Task>, QuestlogError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Task>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at, rowid"
            ))?;
            let rows = stmt.query_map(params![user_id], task_from_row)?;
            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row?);
            }
            Ok(tasks)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a task. Returns `false` if no task matched.
pub async fn delete_task(db: &Database, id: &str) -> Result<bool, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a completion write and its XP award in a single transaction.
///
/// The stored `completed_at` is compared against the caller's expectation
/// first; on mismatch nothing is written and [`CompletionWrite::Stale`] is
/// returned.
pub async fn apply_completion(
    db: &Database,
    update: &CompletionUpdate,
) -> Result<CompletionWrite, QuestlogError> {
    let update = update.clone();
    db.connection()
        .call(move |conn| -> Result<CompletionWrite, rusqlite::Error> {
            let tx = conn.transaction()?;

            let current = tx
                .query_row(
                    "SELECT completed_at, user_id FROM tasks WHERE id = ?1",
                    params![update.task_id],
                    |row| Ok((optional_timestamp_column(row, 0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            let Some((stored_completed_at, user_id)) = current else {
                return Ok(CompletionWrite::Missing);
            };
            if stored_completed_at != update.expected_completed_at {
                debug!(task_id = %update.task_id, "completion write is stale");
                return Ok(CompletionWrite::Stale);
            }

            tx.execute(
                "UPDATE tasks SET completed_at = ?1 WHERE id = ?2",
                params![update.completed_at.as_ref().map(timestamp_text), update.task_id],
            )?;
            if update.xp_award > 0 {
                users::increment_xp(&tx, &user_id, update.xp_award)?;
            }

            let task = select_task(&tx, &update.task_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            tx.commit()?;
            Ok(CompletionWrite::Applied(task))
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::{create_user, get_user};
    use crate::models::User;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
    }

    async fn seed_user(db: &Database) -> User {
        let user = User::new("Ann".to_string(), 2, t0());
        create_user(db, &user).await.unwrap();
        user
    }

    fn make_task(user_id: &str, title: &str, repeat: &[&str], created_at: DateTime<Utc>) -> Task {
        Task::new(
            title.to_string(),
            user_id.to_string(),
            Some(t0() + Duration::hours(4)),
            repeat.iter().map(|s| s.to_string()).collect(),
            created_at,
        )
    }

    #[tokio::test]
    async fn create_and_get_task_roundtrips() {
        let (db, _dir) = setup_db().await;
        let user = seed_user(&db).await;
        let task = make_task(&user.id, "Drink water", &["Mon", "Tue"], t0());

        create_task(&db, &task).await.unwrap();
        let retrieved = get_task(&db, &task.id).await.unwrap().unwrap();
        assert_eq!(retrieved, task);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn create_task_for_missing_user_fails() {
        let (db, _dir) = setup_db().await;
        let task = make_task("ghost", "Orphan", &[], t0());
        let err = create_task(&db, &task).await.unwrap_err();
        assert!(matches!(err, QuestlogError::Storage { .. }));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_tasks_filters_by_owner_in_creation_order() {
        let (db, _dir) = setup_db().await;
        let ann = seed_user(&db).await;
        let bo = User::new("Bo".to_string(), 1, t0());
        create_user(&db, &bo).await.unwrap();

        let second = make_task(&ann.id, "second", &[], t0() + Duration::minutes(1));
        let first = make_task(&ann.id, "first", &[], t0());
        let other = make_task(&bo.id, "other", &[], t0());
        for task in [&second, &first, &other] {
            create_task(&db, task).await.unwrap();
        }

        let tasks = list_tasks_for_user(&db, &ann.id).await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert!(list_tasks_for_user(&db, "nobody").await.unwrap().is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_task_reports_whether_a_row_matched() {
        let (db, _dir) = setup_db().await;
        let user = seed_user(&db).await;
        let task = make_task(&user.id, "Stretch", &[], t0());
        create_task(&db, &task).await.unwrap();

        assert!(delete_task(&db, &task.id).await.unwrap());
        assert!(!delete_task(&db, &task.id).await.unwrap());
        assert!(get_task(&db, &task.id).await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn apply_completion_updates_task_and_awards_xp_together() {
        let (db, _dir) = setup_db().await;
        let user = seed_user(&db).await;
        let task = make_task(&user.id, "Drink water", &["Mon"], t0());
        create_task(&db, &task).await.unwrap();

        let now = t0() + Duration::hours(1);
        let write = apply_completion(
            &db,
            &CompletionUpdate {
                task_id: task.id.clone(),
                expected_completed_at: None,
                completed_at: Some(now),
                xp_award: 10,
            },
        )
        .await
        .unwrap();

        match write {
            CompletionWrite::Applied(updated) => assert_eq!(updated.completed_at, Some(now)),
            other => panic!("expected Applied, got {other:?}"),
        }
        assert_eq!(get_user(&db, &user.id).await.unwrap().unwrap().xp, 10);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn apply_completion_with_stale_expectation_writes_nothing() {
        let (db, _dir) = setup_db().await;
        let user = seed_user(&db).await;
        let task = make_task(&user.id, "Stretch", &[], t0());
        create_task(&db, &task).await.unwrap();

        let write = apply_completion(
            &db,
            &CompletionUpdate {
                task_id: task.id.clone(),
                expected_completed_at: Some(t0()),
                completed_at: Some(t0() + Duration::hours(1)),
                xp_award: 10,
            },
        )
        .await
        .unwrap();

        assert_eq!(write, CompletionWrite::Stale);
        assert!(get_task(&db, &task.id).await.unwrap().unwrap().completed_at.is_none());
        assert_eq!(get_user(&db, &user.id).await.unwrap().unwrap().xp, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn apply_completion_on_missing_task() {
        let (db, _dir) = setup_db().await;
        let write = apply_completion(
            &db,
            &CompletionUpdate {
                task_id: "ghost".to_string(),
                expected_completed_at: None,
                completed_at: Some(t0()),
                xp_award: 10,
            },
        )
        .await
        .unwrap();
        assert_eq!(write, CompletionWrite::Missing);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn apply_completion_can_clear_the_stamp_without_xp() {
        let (db, _dir) = setup_db().await;
        let user = seed_user(&db).await;
        let mut task = make_task(&user.id, "Walk", &["Mon"], t0());
        task.completed_at = Some(t0());
        create_task(&db, &task).await.unwrap();

        let write = apply_completion(
            &db,
            &CompletionUpdate {
                task_id: task.id.clone(),
                expected_completed_at: Some(t0()),
                completed_at: None,
                xp_award: 0,
            },
        )
        .await
        .unwrap();

        match write {
            CompletionWrite::Applied(updated) => assert!(updated.completed_at.is_none()),
            other => panic!("expected Applied, got {other:?}"),
        }
        assert_eq!(get_user(&db, &user.id).await.unwrap().unwrap().xp, 0);

        db.close().await.unwrap();
    }
}
