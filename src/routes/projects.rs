// ABOUTME: Project route handlers: public listings and admin CRUD
// ABOUTME: Public list pins status=published; writes run behind permission guards
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Project routes
//!
//! Reads are public; the admin listing and all writes require an admin token,
//! with create/update behind the `write` permission and delete behind
//! `delete`. The public single-project view increments the view counter.

use crate::{
    database::{ProjectFilter, ProjectSort, ProjectUpdate},
    errors::AppError,
    middleware::guards::require_permission,
    models::{Permission, Project, ProjectCategory, ProjectImage, ProjectStatus},
    pagination::{PageQuery, Pagination},
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Public listing query
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListProjectsQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

/// Admin listing query (adds status and search)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminListProjectsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

/// Project create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub client: Option<String>,
    pub team_size: Option<u32>,
    pub my_role: Option<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
    pub sort_order: Option<i64>,
}

/// Project update request; absent fields are left untouched
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub images: Option<Vec<ProjectImage>>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
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

fn validate_http_url(value: Option<&String>, field: &str) -> Result<(), AppError> {
    match value {
        Some(url) if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") => {
            Err(AppError::invalid_input(format!("{field} must be a valid URL")))
        }
        _ => Ok(()),
    }
}

fn parse_category(raw: &str) -> Result<ProjectCategory, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid project category: {raw}")))
}

fn parse_status(raw: &str) -> Result<ProjectStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid project status: {raw}")))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid project id: {raw}")))
}

/// Project routes handler
pub struct ProjectRoutes;

impl ProjectRoutes {
    /// Create all project routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/portfolio/projects", get(Self::handle_list_public))
            .route("/api/v1/portfolio/projects/:id", get(Self::handle_get))
            .route(
                "/api/v1/portfolio/admin/projects",
                get(Self::handle_list_admin),
            )
            .route("/api/v1/portfolio/admin/projects", post(Self::handle_create))
            .route(
                "/api/v1/portfolio/admin/projects/:id",
                put(Self::handle_update),
            )
            .route(
                "/api/v1/portfolio/admin/projects/:id",
                delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /api/v1/portfolio/projects - public listing.
    ///
    /// Only published projects are visible here regardless of query input.
    async fn handle_list_public(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListProjectsQuery>,
    ) -> Result<Response, AppError> {
        let category = match query.category.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_category(raw)?),
        };

        let filter = ProjectFilter {
            category,
            status: Some(ProjectStatus::Published),
            featured: query.featured.filter(|&f| f),
            search: None,
        };
        let page = PageQuery {
            page: query.page,
            limit: query.limit,
        };
        let sort = query
            .sort
            .as_deref()
            .map_or(ProjectSort::default(), ProjectSort::parse);

        let (projects, total) = resources
            .database
            .list_projects(&filter, sort, page)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        let categories = resources
            .database
            .published_project_categories()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "projects": projects,
                    "pagination": Pagination::new(page, total),
                    "categories": categories,
                },
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/portfolio/projects/:id - public single view
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = parse_id(&id)?;

        let project = resources
            .database
            .get_project(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Project"))?;

        resources
            .database
            .increment_project_views(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let mut project = project;
        project.view_count += 1;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "data": project })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/portfolio/admin/projects - admin listing with stats
    async fn handle_list_admin(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<AdminListProjectsQuery>,
    ) -> Result<Response, AppError> {
        let _context = resources.admin_gate.authenticate(&headers).await?;

        let category = match query.category.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_category(raw)?),
        };
        let status = match query.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        let filter = ProjectFilter {
            category,
            status,
            featured: query.featured.filter(|&f| f),
            search: query.search.filter(|s| !s.trim().is_empty()),
        };
        let page = PageQuery {
            page: query.page,
            limit: query.limit,
        };
        let sort = query
            .sort
            .as_deref()
            .map_or(ProjectSort::default(), ProjectSort::parse);

        let (projects, total) = resources
            .database
            .list_projects(&filter, sort, page)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        let stats = resources
            .database
            .project_stats()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "projects": projects,
                    "pagination": Pagination::new(page, total),
                    "stats": stats,
                },
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/portfolio/admin/projects
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateProjectRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Write)?;

        if request.title.trim().is_empty() || request.description.trim().is_empty() {
            return Err(AppError::missing_field("Title and description are required"));
        }
        validate_http_url(request.live_url.as_ref(), "Live URL")?;
        validate_http_url(request.github_url.as_ref(), "GitHub URL")?;

        let status = match request.status.as_deref() {
            None | Some("") => ProjectStatus::Published,
            Some(raw) => parse_status(raw)?,
        };

        let now = Utc::now();
        let mut project = Project {
            id: Uuid::new_v4(),
            title: request.title.trim().to_owned(),
            description: request.description,
            long_description: request.long_description,
            category: parse_category(&request.category)?,
            technologies: request.technologies,
            images: request.images,
            live_url: request.live_url,
            github_url: request.github_url,
            featured: request.featured,
            status,
            start_date: request.start_date,
            end_date: request.end_date,
            client: request.client,
            team_size: request.team_size,
            my_role: request.my_role,
            challenges: request.challenges,
            solutions: request.solutions,
            results: request.results,
            sort_order: request.sort_order.unwrap_or(0),
            view_count: 0,
            created_by: context.id,
            created_at: now,
            updated_at: now,
        };
        project.normalize_images();

        resources
            .database
            .create_project(&project)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Project created successfully",
                "data": project,
            })),
        )
            .into_response())
    }

    /// Handle PUT /api/v1/portfolio/admin/projects/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateProjectRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Write)?;

        let id = parse_id(&id)?;
        validate_http_url(request.live_url.as_ref(), "Live URL")?;
        validate_http_url(request.github_url.as_ref(), "GitHub URL")?;

        let category = match request.category.as_deref() {
            None => None,
            Some(raw) => Some(parse_category(raw)?),
        };
        let status = match request.status.as_deref() {
            None => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        let update = ProjectUpdate {
            title: request.title,
            description: request.description,
            long_description: request.long_description,
            category,
            technologies: request.technologies,
            images: request.images,
            live_url: request.live_url,
            github_url: request.github_url,
            featured: request.featured,
            status,
            start_date: request.start_date,
            end_date: request.end_date,
            client: request.client,
            team_size: request.team_size,
            my_role: request.my_role,
            challenges: request.challenges,
            solutions: request.solutions,
            results: request.results,
            sort_order: request.sort_order,
        };

        let project = resources
            .database
            .update_project(id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Project"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Project updated successfully",
                "data": project,
            })),
        )
            .into_response())
    }

    /// Handle DELETE /api/v1/portfolio/admin/projects/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Delete)?;

        let id = parse_id(&id)?;
        let removed = resources
            .database
            .delete_project(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !removed {
            return Err(AppError::not_found("Project"));
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Project deleted successfully",
            })),
        )
            .into_response())
    }
}
