// ABOUTME: Database management over a SQLite pool with per-domain operation modules
// ABOUTME: Owns migrations; unique indexes enforce principal email/username uniqueness
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Database Management
//!
//! Storage for the two principal collections and the portfolio content
//! collections. Each domain contributes an `impl Database` block in its own
//! module and a `migrate_*` function invoked from [`Database::migrate`].
//!
//! Uniqueness of email and username is enforced per collection by unique
//! indexes, which also arbitrate racing registrations: the loser surfaces a
//! unique-violation error that the handler layer maps to a conflict response.

mod admins;
mod contacts;
mod experience;
mod projects;
mod skills;
mod users;

pub use contacts::{ContactFilter, ContactStats, ContactUpdate};
pub use experience::ExperienceUpdate;
pub use projects::{ProjectFilter, ProjectSort, ProjectStats, ProjectUpdate};
pub use skills::{SkillFilter, SkillUpdate};
pub use admins::{AdminFilter, AdminProfileUpdate};

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for principals and portfolio content
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_admins().await?;
        self.migrate_users().await?;
        self.migrate_projects().await?;
        self.migrate_skills().await?;
        self.migrate_experience().await?;
        self.migrate_contacts().await?;
        Ok(())
    }

    /// Check database reachability for health reporting
    pub async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
