// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lookup and registration, keyed by email.

use nexa_core::NexaError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{USER_COLUMNS, User, user_from_row};

/// Find a user by email (case-insensitive).
pub async fn find_user_by_email(db: &Database, email: &str) -> Result<Option<User>, NexaError> {
    let email = email.trim().to_lowercase();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert the user unless the email is already registered, then return the stored row.
///
/// The first registration fixes the id, so a returning user keeps it.
pub async fn upsert_user(db: &Database, user: &User) -> Result<User, NexaError> {
    let mut user = user.clone();
    user.email = user.email.trim().to_lowercase();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, name, avatar, role) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(email) DO UPDATE SET name = excluded.name, avatar = excluded.avatar",
                params![user.id, user.email, user.name, user.avatar, user.role.to_string()],
            )?;
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![user.email],
                user_from_row,
            )
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::queries::test_support::setup_db;

    fn make_user(id: &str, email: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={name}"),
            role: Role::User,
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn returning_user_keeps_first_id() {
        let (db, _dir) = setup_db().await;

        let first = upsert_user(&db, &make_user("id-1", "Dana@Example.com", "DANA")).await.unwrap();
        assert_eq!(first.id, "id-1");
        assert_eq!(first.email, "dana@example.com");

        let again = upsert_user(&db, &make_user("id-2", "dana@example.com", "DANA2")).await.unwrap();
        assert_eq!(again.id, "id-1");
        assert_eq!(again.name, "DANA2");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_by_email_is_case_insensitive() {
        let (db, _dir) = setup_db().await;
        upsert_user(&db, &make_user("id-1", "eve@example.com", "EVE")).await.unwrap();

        let found = find_user_by_email(&db, "EVE@example.com ").await.unwrap();
        assert_eq!(found.map(|u| u.id).as_deref(), Some("id-1"));
        assert!(find_user_by_email(&db, "nobody@example.com").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
