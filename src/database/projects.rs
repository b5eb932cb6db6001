// ABOUTME: Project collection database operations
// ABOUTME: Public and admin listings with filters, CRUD, view counting, stats
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::models::{Project, ProjectCategory, ProjectImage, ProjectStatus};
use crate::pagination::PageQuery;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Listing filter shared by public and admin project queries
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    /// Case-insensitive match against title, description or technologies
    pub search: Option<String>,
}

/// Sort order for project listings
#[derive(Debug, Clone, Copy, Default)]
pub enum ProjectSort {
    /// Newest first
    #[default]
    CreatedDesc,
    /// Oldest first
    CreatedAsc,
    /// Manual ordering
    SortOrder,
}

impl ProjectSort {
    const fn sql(self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_at DESC",
            Self::CreatedAsc => "created_at ASC",
            Self::SortOrder => "sort_order ASC, created_at DESC",
        }
    }

    /// Parse the original API's sort parameter form ("-createdAt", "sortOrder")
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "createdAt" => Self::CreatedAsc,
            "sortOrder" => Self::SortOrder,
            _ => Self::CreatedDesc,
        }
    }
}

/// Partial project update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub technologies: Option<Vec<String>>,
    pub images: Option<Vec<ProjectImage>>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub client: Option<String>,
    pub team_size: Option<u32>,
    pub my_role: Option<String>,
    pub challenges: Option<Vec<String>>,
    pub solutions: Option<Vec<String>>,
    pub results: Option<Vec<String>>,
    pub sort_order: Option<i64>,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectStats {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
    pub featured: i64,
}

impl Database {
    /// Create projects table and indexes
    pub(super) async fn migrate_projects(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                long_description TEXT,
                category TEXT NOT NULL,
                technologies TEXT NOT NULL DEFAULT '[]',
                images TEXT NOT NULL DEFAULT '[]',
                live_url TEXT,
                github_url TEXT,
                featured BOOLEAN NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'published' CHECK (status IN ('draft', 'published', 'archived')),
                start_date DATETIME,
                end_date DATETIME,
                client TEXT,
                team_size INTEGER,
                my_role TEXT,
                challenges TEXT NOT NULL DEFAULT '[]',
                solutions TEXT NOT NULL DEFAULT '[]',
                results TEXT NOT NULL DEFAULT '[]',
                sort_order INTEGER NOT NULL DEFAULT 0,
                view_count INTEGER NOT NULL DEFAULT 0,
                created_by TEXT NOT NULL REFERENCES admins(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_category ON projects(category)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_featured ON projects(featured)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_sort ON projects(sort_order)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new project
    pub async fn create_project(&self, project: &Project) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO projects (
                id, title, description, long_description, category, technologies,
                images, live_url, github_url, featured, status, start_date, end_date,
                client, team_size, my_role, challenges, solutions, results,
                sort_order, view_count, created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                      $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
            ",
        )
        .bind(project.id.to_string())
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(project.category.as_str())
        .bind(serde_json::to_string(&project.technologies)?)
        .bind(serde_json::to_string(&project.images)?)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(project.featured)
        .bind(project.status.as_str())
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(&project.client)
        .bind(project.team_size)
        .bind(&project.my_role)
        .bind(serde_json::to_string(&project.challenges)?)
        .bind(serde_json::to_string(&project.solutions)?)
        .bind(serde_json::to_string(&project.results)?)
        .bind(project.sort_order)
        .bind(project.view_count)
        .bind(project.created_by.to_string())
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(project.id)
    }

    /// Get a project by id
    pub async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_project).transpose()
    }

    /// Increment a project's public view counter
    pub async fn increment_project_views(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE projects SET view_count = view_count + 1 WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apply a partial update; returns the updated project when it exists.
    ///
    /// Image updates go through the single-primary normalization on the
    /// caller side before reaching here.
    pub async fn update_project(
        &self,
        id: Uuid,
        update: &ProjectUpdate,
    ) -> Result<Option<Project>> {
        let Some(mut project) = self.get_project(id).await? else {
            return Ok(None);
        };

        if let Some(v) = &update.title {
            project.title.clone_from(v);
        }
        if let Some(v) = &update.description {
            project.description.clone_from(v);
        }
        if let Some(v) = &update.long_description {
            project.long_description = Some(v.clone());
        }
        if let Some(v) = update.category {
            project.category = v;
        }
        if let Some(v) = &update.technologies {
            project.technologies.clone_from(v);
        }
        if let Some(v) = &update.images {
            project.images.clone_from(v);
        }
        if let Some(v) = &update.live_url {
            project.live_url = Some(v.clone());
        }
        if let Some(v) = &update.github_url {
            project.github_url = Some(v.clone());
        }
        if let Some(v) = update.featured {
            project.featured = v;
        }
        if let Some(v) = update.status {
            project.status = v;
        }
        if let Some(v) = update.start_date {
            project.start_date = Some(v);
        }
        if let Some(v) = update.end_date {
            project.end_date = Some(v);
        }
        if let Some(v) = &update.client {
            project.client = Some(v.clone());
        }
        if let Some(v) = update.team_size {
            project.team_size = Some(v);
        }
        if let Some(v) = &update.my_role {
            project.my_role = Some(v.clone());
        }
        if let Some(v) = &update.challenges {
            project.challenges.clone_from(v);
        }
        if let Some(v) = &update.solutions {
            project.solutions.clone_from(v);
        }
        if let Some(v) = &update.results {
            project.results.clone_from(v);
        }
        if let Some(v) = update.sort_order {
            project.sort_order = v;
        }

        project.normalize_images();

        sqlx::query(
            r"
            UPDATE projects SET
                title = $2, description = $3, long_description = $4, category = $5,
                technologies = $6, images = $7, live_url = $8, github_url = $9,
                featured = $10, status = $11, start_date = $12, end_date = $13,
                client = $14, team_size = $15, my_role = $16, challenges = $17,
                solutions = $18, results = $19, sort_order = $20,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(project.category.as_str())
        .bind(serde_json::to_string(&project.technologies)?)
        .bind(serde_json::to_string(&project.images)?)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(project.featured)
        .bind(project.status.as_str())
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(&project.client)
        .bind(project.team_size)
        .bind(&project.my_role)
        .bind(serde_json::to_string(&project.challenges)?)
        .bind(serde_json::to_string(&project.solutions)?)
        .bind(serde_json::to_string(&project.results)?)
        .bind(project.sort_order)
        .execute(&self.pool)
        .await?;

        self.get_project(id).await
    }

    /// Delete a project; returns whether a row was removed
    pub async fn delete_project(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List projects with filters, sorting and pagination
    pub async fn list_projects(
        &self,
        filter: &ProjectFilter,
        sort: ProjectSort,
        page: PageQuery,
    ) -> Result<(Vec<Project>, u64)> {
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
        if let Some(search) = &filter.search {
            clauses.push("(title LIKE $n OR description LIKE $n OR technologies LIKE $n)".into());
            binds.push(format!("%{search}%"));
        }

        let where_sql = Self::build_where(&clauses);

        let count_sql = format!("SELECT COUNT(*) FROM projects {where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM projects {where_sql} ORDER BY {} LIMIT {} OFFSET {}",
            sort.sql(),
            page.limit(),
            page.offset()
        );
        let mut list_query = sqlx::query(&list_sql);
        for bind in &binds {
            list_query = list_query.bind(bind);
        }
        let rows = list_query.fetch_all(&self.pool).await?;

        let projects = rows
            .iter()
            .map(Self::row_to_project)
            .collect::<Result<Vec<_>>>()?;

        Ok((projects, u64::try_from(total).unwrap_or(0)))
    }

    /// Distinct categories among published projects (public filter chips)
    pub async fn published_project_categories(&self) -> Result<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM projects WHERE status = 'published' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Aggregate project counts for the admin dashboard
    pub async fn project_stats(&self) -> Result<ProjectStats> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        let published =
            sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE status = 'published'")
                .fetch_one(&self.pool)
                .await?;
        let draft = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE status = 'draft'")
            .fetch_one(&self.pool)
            .await?;
        let featured = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE featured = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(ProjectStats {
            total,
            published,
            draft,
            featured,
        })
    }

    fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project> {
        let id: String = row.get("id");
        let category: String = row.get("category");
        let status: String = row.get("status");
        let technologies: String = row.get("technologies");
        let images: String = row.get("images");
        let challenges: String = row.get("challenges");
        let solutions: String = row.get("solutions");
        let results: String = row.get("results");
        let created_by: String = row.get("created_by");
        let team_size: Option<i64> = row.get("team_size");

        Ok(Project {
            id: Uuid::parse_str(&id)?,
            title: row.get("title"),
            description: row.get("description"),
            long_description: row.get("long_description"),
            category: category.parse()?,
            technologies: serde_json::from_str(&technologies)?,
            images: serde_json::from_str(&images)?,
            live_url: row.get("live_url"),
            github_url: row.get("github_url"),
            featured: row.get("featured"),
            status: status.parse()?,
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            client: row.get("client"),
            team_size: team_size.and_then(|v| u32::try_from(v).ok()),
            my_role: row.get("my_role"),
            challenges: serde_json::from_str(&challenges)?,
            solutions: serde_json::from_str(&solutions)?,
            results: serde_json::from_str(&results)?,
            sort_order: row.get("sort_order"),
            view_count: row.get("view_count"),
            created_by: Uuid::parse_str(&created_by)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
