// ABOUTME: Admin collection database operations
// ABOUTME: Registration, lookup, profile updates, listing with filters
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::models::{Admin, AdminRole, Permission};
use crate::pagination::PageQuery;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Listing filter for the super-admin account overview
#[derive(Debug, Clone, Default)]
pub struct AdminFilter {
    /// Case-insensitive match against name, username or email
    pub search: Option<String>,
    /// Exact role match
    pub role: Option<AdminRole>,
    /// Active flag match
    pub is_active: Option<bool>,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct AdminProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

impl Database {
    /// Create admins table and indexes
    pub(super) async fn migrate_admins(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS admins (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin' CHECK (role IN ('admin', 'super_admin')),
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                last_login DATETIME,
                permissions TEXT NOT NULL DEFAULT '[]',
                profile_image TEXT,
                created_by TEXT REFERENCES admins(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_admins_email ON admins(email)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_admins_is_active ON admins(is_active)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new admin
    ///
    /// A racing duplicate registration loses to the unique indexes here; the
    /// caller maps the violation to a conflict response.
    pub async fn create_admin(&self, admin: &Admin) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO admins (
                id, username, email, password_hash, role, first_name, last_name,
                is_active, last_login, permissions, profile_image, created_by,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(admin.id.to_string())
        .bind(&admin.username)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.role.as_str())
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(admin.is_active)
        .bind(admin.last_login)
        .bind(serde_json::to_string(&admin.permissions)?)
        .bind(&admin.profile_image)
        .bind(admin.created_by.map(|id| id.to_string()))
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(admin.id)
    }

    /// Get an admin by id
    pub async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>> {
        self.get_admin_impl("id", &id.to_string()).await
    }

    /// Get an admin by email (login path looks up by email only)
    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.get_admin_impl("email", &email.to_lowercase()).await
    }

    /// Find an admin matching either email or username (registration check)
    pub async fn find_admin_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Admin>> {
        let row = sqlx::query("SELECT * FROM admins WHERE email = $1 OR username = $2")
            .bind(email.to_lowercase())
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_admin).transpose()
    }

    /// Check whether a username is taken by a different admin
    pub async fn admin_username_taken(&self, username: &str, exclude: Uuid) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE username = $1 AND id != $2")
                .bind(username)
                .bind(exclude.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn get_admin_impl(&self, field: &str, value: &str) -> Result<Option<Admin>> {
        let query = format!("SELECT * FROM admins WHERE {field} = $1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_admin).transpose()
    }

    fn row_to_admin(row: &sqlx::sqlite::SqliteRow) -> Result<Admin> {
        let id: String = row.get("id");
        let role: String = row.get("role");
        let permissions_json: String = row.get("permissions");
        let created_by: Option<String> = row.get("created_by");

        Ok(Admin {
            id: Uuid::parse_str(&id)?,
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: role.parse()?,
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            is_active: row.get("is_active"),
            last_login: row.get("last_login"),
            permissions: serde_json::from_str::<Vec<Permission>>(&permissions_json)?,
            profile_image: row.get("profile_image"),
            created_by: created_by.map(|s| Uuid::parse_str(&s)).transpose()?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Update an admin's last login timestamp (explicit login only)
    pub async fn update_admin_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE admins SET last_login = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Apply a partial profile update
    pub async fn update_admin_profile(
        &self,
        id: Uuid,
        update: &AdminProfileUpdate,
    ) -> Result<Option<Admin>> {
        sqlx::query(
            r"
            UPDATE admins SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                username = COALESCE($4, username),
                profile_image = COALESCE($5, profile_image),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.username)
        .bind(&update.profile_image)
        .execute(&self.pool)
        .await?;

        self.get_admin(id).await
    }

    /// Replace an admin's password hash
    pub async fn update_admin_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query(
            "UPDATE admins SET password_hash = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Set the active flag; deactivation invalidates all outstanding tokens
    pub async fn set_admin_active(&self, id: Uuid, active: bool) -> Result<()> {
        sqlx::query(
            "UPDATE admins SET is_active = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(active)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List admins with filters and pagination, newest first
    pub async fn list_admins(
        &self,
        filter: &AdminFilter,
        page: PageQuery,
    ) -> Result<(Vec<Admin>, u64)> {
        let mut where_clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(search) = &filter.search {
            where_clauses.push(
                "(first_name LIKE $n OR last_name LIKE $n OR username LIKE $n OR email LIKE $n)"
                    .into(),
            );
            binds.push(format!("%{search}%"));
        }
        if let Some(role) = filter.role {
            where_clauses.push("role = $n".into());
            binds.push(role.as_str().to_owned());
        }
        if let Some(active) = filter.is_active {
            where_clauses.push("is_active = $n".into());
            binds.push(if active { "1".into() } else { "0".into() });
        }

        let where_sql = Self::build_where(&where_clauses);

        let count_sql = format!("SELECT COUNT(*) FROM admins {where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM admins {where_sql} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            page.limit(),
            page.offset()
        );
        let mut list_query = sqlx::query(&list_sql);
        for bind in &binds {
            list_query = list_query.bind(bind);
        }
        let rows = list_query.fetch_all(&self.pool).await?;

        let admins = rows
            .iter()
            .map(Self::row_to_admin)
            .collect::<Result<Vec<_>>>()?;

        Ok((admins, u64::try_from(total).unwrap_or(0)))
    }

    /// Total admin count
    pub async fn count_admins(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Render positional WHERE SQL from accumulated clauses
    pub(super) fn build_where(clauses: &[String]) -> String {
        if clauses.is_empty() {
            return String::new();
        }
        let mut n = 0;
        let rendered: Vec<String> = clauses
            .iter()
            .map(|c| {
                n += 1;
                c.replace("$n", &format!("${n}"))
            })
            .collect();
        format!("WHERE {}", rendered.join(" AND "))
    }
}
