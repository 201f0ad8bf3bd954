// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpdesk ticket operations.

use nexa_core::NexaError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{TICKET_COLUMNS, Ticket, TicketStatus, ticket_from_row};

/// Insert a ticket. A duplicate id is ignored and reported as `false`.
pub async fn insert_ticket(db: &Database, ticket: &Ticket) -> Result<bool, NexaError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO tickets (id, user_id, user_name, subject, status, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    ticket.id,
                    ticket.user_id,
                    ticket.user_name,
                    ticket.subject,
                    ticket.status.to_string(),
                    ticket.timestamp,
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// All tickets, newest first.
pub async fn list_tickets(db: &Database) -> Result<Vec<Ticket>, NexaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY timestamp DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([], ticket_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a ticket closed. Returns `false` if no ticket has that id.
pub async fn close_ticket(db: &Database, id: &str) -> Result<bool, NexaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let updated = conn.execute(
                "UPDATE tickets SET status = ?1 WHERE id = ?2",
                params![TicketStatus::Closed.to_string(), id],
            )?;
            Ok(updated == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a ticket. Returns `false` if no ticket has that id.
pub async fn delete_ticket(db: &Database, id: &str) -> Result<bool, NexaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
            Ok(deleted == 1)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    fn make_ticket(id: &str, timestamp: i64) -> Ticket {
        Ticket {
            id: id.to_string(),
            user_id: "u1".to_string(),
            user_name: "BOB".to_string(),
            subject: format!("issue {id}"),
            status: TicketStatus::Open,
            timestamp,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (db, _dir) = setup_db().await;
        insert_ticket(&db, &make_ticket("t1", 10)).await.unwrap();
        insert_ticket(&db, &make_ticket("t2", 30)).await.unwrap();
        insert_ticket(&db, &make_ticket("t3", 20)).await.unwrap();

        let ids: Vec<_> = list_tickets(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, ["t2", "t3", "t1"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn close_flips_status() {
        let (db, _dir) = setup_db().await;
        insert_ticket(&db, &make_ticket("t1", 10)).await.unwrap();

        assert!(close_ticket(&db, "t1").await.unwrap());
        assert_eq!(list_tickets(&db).await.unwrap()[0].status, TicketStatus::Closed);
        assert!(!close_ticket(&db, "missing").await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_reports_missing_ids() {
        let (db, _dir) = setup_db().await;
        insert_ticket(&db, &make_ticket("t1", 10)).await.unwrap();

        assert!(delete_ticket(&db, "t1").await.unwrap());
        assert!(!delete_ticket(&db, "t1").await.unwrap());
        assert!(list_tickets(&db).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
