// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion box operations.

use nexa_core::NexaError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{SUGGESTION_COLUMNS, Suggestion, suggestion_from_row};

pub async fn insert_suggestion(db: &Database, suggestion: &Suggestion) -> Result<bool, NexaError> {
    let s = suggestion.clone();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO suggestions
                 (id, user_id, user_name, user_avatar, content, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![s.id, s.user_id, s.user_name, s.user_avatar, s.content, s.timestamp],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// All suggestions, newest first.
pub async fn list_suggestions(db: &Database) -> Result<Vec<Suggestion>, NexaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SUGGESTION_COLUMNS} FROM suggestions ORDER BY timestamp DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([], suggestion_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_suggestion(db: &Database, id: &str) -> Result<bool, NexaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM suggestions WHERE id = ?1", params![id])?;
            Ok(deleted == 1)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    fn make_suggestion(id: &str, timestamp: i64) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            user_id: "u2".to_string(),
            user_name: "CAROL".to_string(),
            user_avatar: "https://example.com/c.svg".to_string(),
            content: "dark mode please".to_string(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn insert_list_delete() {
        let (db, _dir) = setup_db().await;
        insert_suggestion(&db, &make_suggestion("s1", 1)).await.unwrap();
        insert_suggestion(&db, &make_suggestion("s2", 2)).await.unwrap();

        let listed = list_suggestions(&db).await.unwrap();
        assert_eq!(listed[0].id, "s2");
        assert_eq!(listed[1], make_suggestion("s1", 1));

        assert!(delete_suggestion(&db, "s1").await.unwrap());
        assert!(!delete_suggestion(&db, "nope").await.unwrap());
        assert_eq!(list_suggestions(&db).await.unwrap().len(), 1);
        db.close().await.unwrap();
    }
}
