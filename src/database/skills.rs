// ABOUTME: Skill collection database operations
// ABOUTME: CRUD plus filtered listing ordered by sort order and proficiency
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::models::{Skill, SkillCategory, SkillStatus};
use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

/// Listing filter for skills
#[derive(Debug, Clone, Default)]
pub struct SkillFilter {
    pub category: Option<SkillCategory>,
    pub status: Option<SkillStatus>,
    pub featured: Option<bool>,
}

/// Partial skill update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct SkillUpdate {
    pub name: Option<String>,
    pub category: Option<SkillCategory>,
    pub proficiency: Option<u8>,
    pub years_of_experience: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<SkillStatus>,
    pub sort_order: Option<i64>,
}

impl Database {
    /// Create skills table and indexes
    pub(super) async fn migrate_skills(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS skills (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                category TEXT NOT NULL,
                proficiency INTEGER NOT NULL CHECK (proficiency BETWEEN 0 AND 100),
                years_of_experience REAL,
                description TEXT,
                icon TEXT,
                color TEXT NOT NULL DEFAULT '#3b82f6',
                featured BOOLEAN NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'learning', 'inactive')),
                certifications TEXT NOT NULL DEFAULT '[]',
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_by TEXT NOT NULL REFERENCES admins(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_skills_category ON skills(category)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_skills_status ON skills(status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new skill (name uniqueness enforced by the index)
    pub async fn create_skill(&self, skill: &Skill) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO skills (
                id, name, category, proficiency, years_of_experience, description,
                icon, color, featured, status, certifications, sort_order,
                created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(skill.id.to_string())
        .bind(&skill.name)
        .bind(skill.category.as_str())
        .bind(i64::from(skill.proficiency))
        .bind(skill.years_of_experience)
        .bind(&skill.description)
        .bind(&skill.icon)
        .bind(&skill.color)
        .bind(skill.featured)
        .bind(skill.status.as_str())
        .bind(serde_json::to_string(&skill.certifications)?)
        .bind(skill.sort_order)
        .bind(skill.created_by.to_string())
        .bind(skill.created_at)
        .bind(skill.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(skill.id)
    }

    /// Get a skill by id
    pub async fn get_skill(&self, id: Uuid) -> Result<Option<Skill>> {
        let row = sqlx::query("SELECT * FROM skills WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_skill).transpose()
    }

    /// Get a skill by its unique name
    pub async fn get_skill_by_name(&self, name: &str) -> Result<Option<Skill>> {
        let row = sqlx::query("SELECT * FROM skills WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_skill).transpose()
    }

    /// Apply a partial update; returns the updated skill when it exists
    pub async fn update_skill(&self, id: Uuid, update: &SkillUpdate) -> Result<Option<Skill>> {
        let Some(mut skill) = self.get_skill(id).await? else {
            return Ok(None);
        };

        if let Some(v) = &update.name {
            skill.name.clone_from(v);
        }
        if let Some(v) = update.category {
            skill.category = v;
        }
        if let Some(v) = update.proficiency {
            skill.proficiency = v.min(100);
        }
        if let Some(v) = update.years_of_experience {
            skill.years_of_experience = Some(v);
        }
        if let Some(v) = &update.description {
            skill.description = Some(v.clone());
        }
        if let Some(v) = &update.icon {
            skill.icon = Some(v.clone());
        }
        if let Some(v) = &update.color {
            skill.color.clone_from(v);
        }
        if let Some(v) = update.featured {
            skill.featured = v;
        }
        if let Some(v) = update.status {
            skill.status = v;
        }
        if let Some(v) = update.sort_order {
            skill.sort_order = v;
        }

        sqlx::query(
            r"
            UPDATE skills SET
                name = $2, category = $3, proficiency = $4, years_of_experience = $5,
                description = $6, icon = $7, color = $8, featured = $9, status = $10,
                sort_order = $11, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&skill.name)
        .bind(skill.category.as_str())
        .bind(i64::from(skill.proficiency))
        .bind(skill.years_of_experience)
        .bind(&skill.description)
        .bind(&skill.icon)
        .bind(&skill.color)
        .bind(skill.featured)
        .bind(skill.status.as_str())
        .bind(skill.sort_order)
        .execute(&self.pool)
        .await?;

        self.get_skill(id).await
    }

    /// Delete a skill; returns whether a row was removed
    pub async fn delete_skill(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List skills with filters, ordered by sort order then proficiency
    pub async fn list_skills(&self, filter: &SkillFilter) -> Result<Vec<Skill>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(category) = filter.category {
            clauses.push("category = $n".into());
            binds.push(category.as_str().to_owned());
        }
        if let Some(status) = filter.status {
            clauses.push("status = $n".into());
            binds.push(status.as_str().to_owned());
        }
        if let Some(featured) = filter.featured {
            clauses.push("featured = $n".into());
            binds.push(if featured { "1".into() } else { "0".into() });
        }

        let where_sql = Self::build_where(&clauses);
        let sql = format!(
            "SELECT * FROM skills {where_sql} ORDER BY sort_order ASC, proficiency DESC"
        );

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(Self::row_to_skill).collect()
    }

    fn row_to_skill(row: &sqlx::sqlite::SqliteRow) -> Result<Skill> {
        let id: String = row.get("id");
        let category: String = row.get("category");
        let status: String = row.get("status");
        let certifications: String = row.get("certifications");
        let created_by: String = row.get("created_by");
        let proficiency: i64 = row.get("proficiency");

        Ok(Skill {
            id: Uuid::parse_str(&id)?,
            name: row.get("name"),
            category: category.parse()?,
            proficiency: u8::try_from(proficiency.clamp(0, 100)).unwrap_or(0),
            years_of_experience: row.get("years_of_experience"),
            description: row.get("description"),
            icon: row.get("icon"),
            color: row.get("color"),
            featured: row.get("featured"),
            status: status.parse()?,
            certifications: serde_json::from_str(&certifications)?,
            sort_order: row.get("sort_order"),
            created_by: Uuid::parse_str(&created_by)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
