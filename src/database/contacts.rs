// ABOUTME: Contact-message database operations
// ABOUTME: Status transitions stamp read/replied/archived timestamps in the write path
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::models::{ContactMessage, ContactPriority, ContactStatus};
use crate::pagination::PageQuery;
use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

/// Listing filter for contact messages
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    pub project_type: Option<String>,
    /// Case-insensitive match against name, email, subject, message or company
    pub search: Option<String>,
}

/// Partial message update applied by admins
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Aggregate counts for the messages dashboard
#[derive(Debug, Clone, serde::Serialize)]
pub struct ContactStats {
    pub total: i64,
    pub status_counts: HashMap<String, i64>,
    pub priority_counts: HashMap<String, i64>,
}

impl Database {
    /// Create contact_messages table and indexes
    pub(super) async fn migrate_contacts(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                phone TEXT,
                company TEXT,
                project_type TEXT,
                budget TEXT,
                timeline TEXT,
                source TEXT NOT NULL DEFAULT 'Website',
                status TEXT NOT NULL DEFAULT 'new'
                    CHECK (status IN ('new', 'read', 'replied', 'archived', 'spam')),
                priority TEXT NOT NULL DEFAULT 'medium'
                    CHECK (priority IN ('low', 'medium', 'high', 'urgent')),
                tags TEXT NOT NULL DEFAULT '[]',
                notes TEXT,
                ip_address TEXT,
                user_agent TEXT,
                read_at DATETIME,
                replied_at DATETIME,
                archived_at DATETIME,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_contacts_status ON contact_messages(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_contacts_priority ON contact_messages(priority)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_contacts_created ON contact_messages(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist an inbound contact-form submission
    pub async fn create_contact(&self, message: &ContactMessage) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO contact_messages (
                id, name, email, subject, message, phone, company, project_type,
                budget, timeline, source, status, priority, tags, notes,
                ip_address, user_agent, read_at, replied_at, archived_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18, $19, $20, $21, $22)
            ",
        )
        .bind(message.id.to_string())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(&message.phone)
        .bind(&message.company)
        .bind(&message.project_type)
        .bind(&message.budget)
        .bind(&message.timeline)
        .bind(&message.source)
        .bind(message.status.as_str())
        .bind(message.priority.as_str())
        .bind(serde_json::to_string(&message.tags)?)
        .bind(&message.notes)
        .bind(&message.ip_address)
        .bind(&message.user_agent)
        .bind(message.read_at)
        .bind(message.replied_at)
        .bind(message.archived_at)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(message.id)
    }

    /// Get a message by id
    pub async fn get_contact(&self, id: Uuid) -> Result<Option<ContactMessage>> {
        let row = sqlx::query("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_contact).transpose()
    }

    /// Apply an admin update; returns the updated message when it exists.
    ///
    /// Status transitions stamp the matching timestamp exactly once: moving
    /// to read/replied/archived sets read_at/replied_at/archived_at only if
    /// still unset.
    pub async fn update_contact(
        &self,
        id: Uuid,
        update: &ContactUpdate,
    ) -> Result<Option<ContactMessage>> {
        let Some(mut message) = self.get_contact(id).await? else {
            return Ok(None);
        };

        if let Some(status) = update.status {
            if status != message.status {
                let now = Utc::now();
                match status {
                    ContactStatus::Read if message.read_at.is_none() => {
                        message.read_at = Some(now);
                    }
                    ContactStatus::Replied if message.replied_at.is_none() => {
                        message.replied_at = Some(now);
                    }
                    ContactStatus::Archived if message.archived_at.is_none() => {
                        message.archived_at = Some(now);
                    }
                    _ => {}
                }
            }
            message.status = status;
        }
        if let Some(priority) = update.priority {
            message.priority = priority;
        }
        if let Some(notes) = &update.notes {
            message.notes = Some(notes.clone());
        }
        if let Some(tags) = &update.tags {
            message.tags.clone_from(tags);
        }

        sqlx::query(
            r"
            UPDATE contact_messages SET
                status = $2, priority = $3, notes = $4, tags = $5,
                read_at = $6, replied_at = $7, archived_at = $8,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(message.status.as_str())
        .bind(message.priority.as_str())
        .bind(&message.notes)
        .bind(serde_json::to_string(&message.tags)?)
        .bind(message.read_at)
        .bind(message.replied_at)
        .bind(message.archived_at)
        .execute(&self.pool)
        .await?;

        self.get_contact(id).await
    }

    /// Delete a message; returns whether a row was removed
    pub async fn delete_contact(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List messages with filters and pagination, newest first
    pub async fn list_contacts(
        &self,
        filter: &ContactFilter,
        page: PageQuery,
    ) -> Result<(Vec<ContactMessage>, u64)> {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push("status = $n".into());
            binds.push(status.as_str().to_owned());
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = $n".into());
            binds.push(priority.as_str().to_owned());
        }
        if let Some(project_type) = &filter.project_type {
            clauses.push("project_type = $n".into());
            binds.push(project_type.clone());
        }
        if let Some(search) = &filter.search {
            clauses.push(
                "(name LIKE $n OR email LIKE $n OR subject LIKE $n OR message LIKE $n OR company LIKE $n)"
                    .into(),
            );
            binds.push(format!("%{search}%"));
        }

        let where_sql = Self::build_where(&clauses);

        let count_sql = format!("SELECT COUNT(*) FROM contact_messages {where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM contact_messages {where_sql} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            page.limit(),
            page.offset()
        );
        let mut list_query = sqlx::query(&list_sql);
        for bind in &binds {
            list_query = list_query.bind(bind);
        }
        let rows = list_query.fetch_all(&self.pool).await?;

        let messages = rows
            .iter()
            .map(Self::row_to_contact)
            .collect::<Result<Vec<_>>>()?;

        Ok((messages, u64::try_from(total).unwrap_or(0)))
    }

    /// Aggregate message counts by status and priority
    pub async fn contact_stats(&self) -> Result<ContactStats> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;

        let status_rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM contact_messages GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        let status_counts = status_rows
            .iter()
            .map(|row| (row.get::<String, _>("status"), row.get::<i64, _>("count")))
            .collect();

        let priority_rows = sqlx::query(
            "SELECT priority, COUNT(*) AS count FROM contact_messages GROUP BY priority",
        )
        .fetch_all(&self.pool)
        .await?;
        let priority_counts = priority_rows
            .iter()
            .map(|row| (row.get::<String, _>("priority"), row.get::<i64, _>("count")))
            .collect();

        Ok(ContactStats {
            total,
            status_counts,
            priority_counts,
        })
    }

    /// Count of messages still in the `new` state
    pub async fn count_new_contacts(&self) -> Result<i64> {
        let count =
            sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE status = 'new'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    fn row_to_contact(row: &sqlx::sqlite::SqliteRow) -> Result<ContactMessage> {
        let id: String = row.get("id");
        let status: String = row.get("status");
        let priority: String = row.get("priority");
        let tags: String = row.get("tags");

        Ok(ContactMessage {
            id: Uuid::parse_str(&id)?,
            name: row.get("name"),
            email: row.get("email"),
            subject: row.get("subject"),
            message: row.get("message"),
            phone: row.get("phone"),
            company: row.get("company"),
            project_type: row.get("project_type"),
            budget: row.get("budget"),
            timeline: row.get("timeline"),
            source: row.get("source"),
            status: status.parse()?,
            priority: priority.parse()?,
            tags: serde_json::from_str(&tags)?,
            notes: row.get("notes"),
            ip_address: row.get("ip_address"),
            user_agent: row.get("user_agent"),
            read_at: row.get("read_at"),
            replied_at: row.get("replied_at"),
            archived_at: row.get("archived_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
