// ABOUTME: Experience collection database operations
// ABOUTME: CRUD plus listing ordered by start date; current positions clear end_date
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::models::{EmploymentType, Experience, WorkType};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Partial experience update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ExperienceUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub work_type: Option<WorkType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub current: Option<bool>,
    pub description: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub company_logo: Option<String>,
    pub company_website: Option<String>,
    pub featured: Option<bool>,
    pub sort_order: Option<i64>,
}

impl Database {
    /// Create experience table and indexes
    pub(super) async fn migrate_experience(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS experience (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                employment_type TEXT NOT NULL,
                work_type TEXT NOT NULL DEFAULT 'On-site',
                start_date DATETIME NOT NULL,
                end_date DATETIME,
                current BOOLEAN NOT NULL DEFAULT 0,
                description TEXT NOT NULL,
                achievements TEXT NOT NULL DEFAULT '[]',
                responsibilities TEXT NOT NULL DEFAULT '[]',
                technologies TEXT NOT NULL DEFAULT '[]',
                company_logo TEXT,
                company_website TEXT,
                featured BOOLEAN NOT NULL DEFAULT 0,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_by TEXT NOT NULL REFERENCES admins(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_experience_start ON experience(start_date)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_experience_current ON experience(current)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new experience entry.
    ///
    /// Current positions carry no end date; the write path clears it here
    /// rather than relying on an implicit save hook.
    pub async fn create_experience(&self, experience: &Experience) -> Result<Uuid> {
        let end_date = if experience.current {
            None
        } else {
            experience.end_date
        };

        sqlx::query(
            r"
            INSERT INTO experience (
                id, title, company, location, employment_type, work_type,
                start_date, end_date, current, description, achievements,
                responsibilities, technologies, company_logo, company_website,
                featured, sort_order, created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18, $19, $20)
            ",
        )
        .bind(experience.id.to_string())
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(experience.employment_type.as_str())
        .bind(experience.work_type.as_str())
        .bind(experience.start_date)
        .bind(end_date)
        .bind(experience.current)
        .bind(&experience.description)
        .bind(serde_json::to_string(&experience.achievements)?)
        .bind(serde_json::to_string(&experience.responsibilities)?)
        .bind(serde_json::to_string(&experience.technologies)?)
        .bind(&experience.company_logo)
        .bind(&experience.company_website)
        .bind(experience.featured)
        .bind(experience.sort_order)
        .bind(experience.created_by.to_string())
        .bind(experience.created_at)
        .bind(experience.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(experience.id)
    }

    /// Get an experience entry by id
    pub async fn get_experience(&self, id: Uuid) -> Result<Option<Experience>> {
        let row = sqlx::query("SELECT * FROM experience WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_experience).transpose()
    }

    /// Apply a partial update; returns the updated entry when it exists
    pub async fn update_experience(
        &self,
        id: Uuid,
        update: &ExperienceUpdate,
    ) -> Result<Option<Experience>> {
        let Some(mut experience) = self.get_experience(id).await? else {
            return Ok(None);
        };

        if let Some(v) = &update.title {
            experience.title.clone_from(v);
        }
        if let Some(v) = &update.company {
            experience.company.clone_from(v);
        }
        if let Some(v) = &update.location {
            experience.location.clone_from(v);
        }
        if let Some(v) = update.employment_type {
            experience.employment_type = v;
        }
        if let Some(v) = update.work_type {
            experience.work_type = v;
        }
        if let Some(v) = update.start_date {
            experience.start_date = v;
        }
        if let Some(v) = update.end_date {
            experience.end_date = Some(v);
        }
        if let Some(v) = update.current {
            experience.current = v;
        }
        if let Some(v) = &update.description {
            experience.description.clone_from(v);
        }
        if let Some(v) = &update.achievements {
            experience.achievements.clone_from(v);
        }
        if let Some(v) = &update.responsibilities {
            experience.responsibilities.clone_from(v);
        }
        if let Some(v) = &update.technologies {
            experience.technologies.clone_from(v);
        }
        if let Some(v) = &update.company_logo {
            experience.company_logo = Some(v.clone());
        }
        if let Some(v) = &update.company_website {
            experience.company_website = Some(v.clone());
        }
        if let Some(v) = update.featured {
            experience.featured = v;
        }
        if let Some(v) = update.sort_order {
            experience.sort_order = v;
        }

        // Current position implies no end date
        if experience.current {
            experience.end_date = None;
        }

        sqlx::query(
            r"
            UPDATE experience SET
                title = $2, company = $3, location = $4, employment_type = $5,
                work_type = $6, start_date = $7, end_date = $8, current = $9,
                description = $10, achievements = $11, responsibilities = $12,
                technologies = $13, company_logo = $14, company_website = $15,
                featured = $16, sort_order = $17, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(experience.employment_type.as_str())
        .bind(experience.work_type.as_str())
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(experience.current)
        .bind(&experience.description)
        .bind(serde_json::to_string(&experience.achievements)?)
        .bind(serde_json::to_string(&experience.responsibilities)?)
        .bind(serde_json::to_string(&experience.technologies)?)
        .bind(&experience.company_logo)
        .bind(&experience.company_website)
        .bind(experience.featured)
        .bind(experience.sort_order)
        .execute(&self.pool)
        .await?;

        self.get_experience(id).await
    }

    /// Delete an experience entry; returns whether a row was removed
    pub async fn delete_experience(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM experience WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all experience entries, most recent first
    pub async fn list_experience(&self, featured_only: bool) -> Result<Vec<Experience>> {
        let sql = if featured_only {
            "SELECT * FROM experience WHERE featured = 1 ORDER BY start_date DESC"
        } else {
            "SELECT * FROM experience ORDER BY start_date DESC"
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_experience).collect()
    }

    fn row_to_experience(row: &sqlx::sqlite::SqliteRow) -> Result<Experience> {
        let id: String = row.get("id");
        let employment_type: String = row.get("employment_type");
        let work_type: String = row.get("work_type");
        let achievements: String = row.get("achievements");
        let responsibilities: String = row.get("responsibilities");
        let technologies: String = row.get("technologies");
        let created_by: String = row.get("created_by");

        Ok(Experience {
            id: Uuid::parse_str(&id)?,
            title: row.get("title"),
            company: row.get("company"),
            location: row.get("location"),
            employment_type: employment_type.parse()?,
            work_type: work_type.parse()?,
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            current: row.get("current"),
            description: row.get("description"),
            achievements: serde_json::from_str(&achievements)?,
            responsibilities: serde_json::from_str(&responsibilities)?,
            technologies: serde_json::from_str(&technologies)?,
            company_logo: row.get("company_logo"),
            company_website: row.get("company_website"),
            featured: row.get("featured"),
            sort_order: row.get("sort_order"),
            created_by: Uuid::parse_str(&created_by)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
