// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use questlog_core::QuestlogError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::User;
use crate::queries::{optional_json_column, timestamp_column, timestamp_text};

const USER_COLUMNS: &str = "id, name, avatar_index, xp, level, hydration_progress, \
     medication_progress, achievements, cards, created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        avatar_index: row.get(2)?,
        xp: row.get(3)?,
        level: row.get(4)?,
        hydration_progress: row.get(5)?,
        medication_progress: row.get(6)?,
        achievements: optional_json_column(row, 7)?,
        cards: optional_json_column(row, 8)?,
        created_at: timestamp_column(row, 9)?,
    })
}

/// Insert a new user.
pub async fn create_user(db: &Database, user: &User) -> Result<(), QuestlogError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO users (id, name, avatar_index, xp, level, hydration_progress,
                                    medication_progress, achievements, cards, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    user.id,
                    user.name,
                    user.avatar_index,
                    user.xp,
                    user.level,
                    user.hydration_progress,
                    user.medication_progress,
                    user.achievements.as_ref().map(|v| v.to_string()),
                    user.cards.as_ref().map(|v| v.to_string()),
                    timestamp_text(&user.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by ID.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Set a user's avatar, returning the updated row or `None` if no user matched.
pub async fn update_avatar(
    db: &Database,
    id: &str,
    avatar_index: i64,
) -> Result<Option<User>, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("UPDATE users SET avatar_index = ?1 WHERE id = ?2 RETURNING {USER_COLUMNS}"),
                params![avatar_index, id],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Add `amount` to a user's XP inside an open transaction.
///
/// Fails with `QueryReturnedNoRows` if the user does not exist, so the
/// surrounding transaction is rolled back.
pub(crate) fn increment_xp(
    conn: &rusqlite::Connection,
    user_id: &str,
    amount: i64,
) -> rusqlite::Result<()> {
    let updated = conn.execute(
        "UPDATE users SET xp = xp + ?1 WHERE id = ?2",
        params![amount, user_id],
    )?;
    if updated == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}
