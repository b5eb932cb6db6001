// ABOUTME: User collection database operations
// ABOUTME: Registration, lookup by email, last-login and active-flag updates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::models::{SocialLinks, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create users table and indexes
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin', 'moderator')),
                is_active BOOLEAN NOT NULL DEFAULT 1,
                last_login DATETIME,
                profile_picture TEXT,
                bio TEXT,
                phone TEXT,
                social_links TEXT NOT NULL DEFAULT '{}',
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_is_active ON users(is_active)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// Racing duplicates lose to the unique indexes; the caller maps the
    /// violation to a conflict response.
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, first_name, last_name, username, email, password_hash, role,
                is_active, last_login, profile_picture, bio, phone, social_links,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.last_login)
        .bind(&user.profile_picture)
        .bind(&user.bio)
        .bind(&user.phone)
        .bind(serde_json::to_string(&user.social_links)?)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by id
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.get_user_impl("id", &id.to_string()).await
    }

    /// Get a user by email (login path looks up by email only)
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_impl("email", &email.to_lowercase()).await
    }

    /// Find a user matching either email or username (registration check)
    pub async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1 OR username = $2")
            .bind(email.to_lowercase())
            .bind(username.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> Result<Option<User>> {
        let query = format!("SELECT * FROM users WHERE {field} = $1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.get("id");
        let role: String = row.get("role");
        let social_links_json: String = row.get("social_links");

        Ok(User {
            id: Uuid::parse_str(&id)?,
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: role.parse()?,
            is_active: row.get("is_active"),
            last_login: row.get("last_login"),
            profile_picture: row.get("profile_picture"),
            bio: row.get("bio"),
            phone: row.get("phone"),
            social_links: serde_json::from_str::<SocialLinks>(&social_links_json)
                .unwrap_or_default(),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Update a user's last login timestamp (explicit login only)
    pub async fn update_user_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE users SET last_login = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Set the active flag; deactivation invalidates all outstanding tokens
    pub async fn set_user_active(&self, id: Uuid, active: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_active = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
            .bind(active)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Total user count
    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
