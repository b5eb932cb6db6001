// ABOUTME: Experience route handlers: public listing and admin CRUD
// ABOUTME: Current positions clear end_date via explicit write-path logic
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Experience routes

use crate::{
    database::ExperienceUpdate,
    errors::AppError,
    middleware::guards::require_permission,
    models::{EmploymentType, Experience, Permission, WorkType},
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
pub struct ListExperienceQuery {
    pub featured: Option<bool>,
}

/// Experience create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperienceRequest {
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub work_type: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub company_logo: Option<String>,
    pub company_website: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub sort_order: Option<i64>,
}

/// Experience update request; absent fields are left untouched
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub work_type: Option<String>,
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

fn parse_employment_type(raw: &str) -> Result<EmploymentType, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid employment type: {raw}")))
}

fn parse_work_type(raw: &str) -> Result<WorkType, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid work type: {raw}")))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::invalid_input(format!("Invalid experience id: {raw}")))
}

fn validate_website(value: Option<&String>) -> Result<(), AppError> {
    match value {
        Some(url)
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") =>
        {
            Err(AppError::invalid_input(
                "Company website must be a valid URL",
            ))
        }
        _ => Ok(()),
    }
}

/// Experience routes handler
pub struct ExperienceRoutes;

impl ExperienceRoutes {
    /// Create all experience routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/portfolio/experience", get(Self::handle_list))
            .route(
                "/api/v1/portfolio/admin/experience",
                post(Self::handle_create),
            )
            .route(
                "/api/v1/portfolio/admin/experience/:id",
                put(Self::handle_update),
            )
            .route(
                "/api/v1/portfolio/admin/experience/:id",
                delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /api/v1/portfolio/experience - public listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListExperienceQuery>,
    ) -> Result<Response, AppError> {
        let entries = resources
            .database
            .list_experience(query.featured.unwrap_or(false))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        // Attach derived duration/period display fields
        let items: Vec<serde_json::Value> = entries
            .iter()
            .map(|entry| {
                let mut value = serde_json::to_value(entry).unwrap_or_default();
                if let Some(map) = value.as_object_mut() {
                    map.insert("duration".into(), json!(entry.duration()));
                    map.insert("period".into(), json!(entry.period()));
                }
                value
            })
            .collect();

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "experience": items } })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/portfolio/admin/experience
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateExperienceRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Write)?;

        let required = [
            &request.title,
            &request.company,
            &request.location,
            &request.description,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::missing_field(
                "Title, company, location and description are required",
            ));
        }
        validate_website(request.company_website.as_ref())?;

        let work_type = match request.work_type.as_deref() {
            None | Some("") => WorkType::OnSite,
            Some(raw) => parse_work_type(raw)?,
        };

        let now = Utc::now();
        let experience = Experience {
            id: Uuid::new_v4(),
            title: request.title.trim().to_owned(),
            company: request.company.trim().to_owned(),
            location: request.location.trim().to_owned(),
            employment_type: parse_employment_type(&request.employment_type)?,
            work_type,
            start_date: request.start_date,
            end_date: if request.current {
                None
            } else {
                request.end_date
            },
            current: request.current,
            description: request.description,
            achievements: request.achievements,
            responsibilities: request.responsibilities,
            technologies: request.technologies,
            company_logo: request.company_logo,
            company_website: request.company_website,
            featured: request.featured,
            sort_order: request.sort_order.unwrap_or(0),
            created_by: context.id,
            created_at: now,
            updated_at: now,
        };

        resources
            .database
            .create_experience(&experience)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Experience created successfully",
                "data": experience,
            })),
        )
            .into_response())
    }

    /// Handle PUT /api/v1/portfolio/admin/experience/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateExperienceRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Write)?;

        let id = parse_id(&id)?;
        validate_website(request.company_website.as_ref())?;

        let employment_type = match request.employment_type.as_deref() {
            None => None,
            Some(raw) => Some(parse_employment_type(raw)?),
        };
        let work_type = match request.work_type.as_deref() {
            None => None,
            Some(raw) => Some(parse_work_type(raw)?),
        };

        let update = ExperienceUpdate {
            title: request.title,
            company: request.company,
            location: request.location,
            employment_type,
            work_type,
            start_date: request.start_date,
            end_date: request.end_date,
            current: request.current,
            description: request.description,
            achievements: request.achievements,
            responsibilities: request.responsibilities,
            technologies: request.technologies,
            company_logo: request.company_logo,
            company_website: request.company_website,
            featured: request.featured,
            sort_order: request.sort_order,
        };

        let experience = resources
            .database
            .update_experience(id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Experience"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Experience updated successfully",
                "data": experience,
            })),
        )
            .into_response())
    }

    /// Handle DELETE /api/v1/portfolio/admin/experience/:id
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
            .delete_experience(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !removed {
            return Err(AppError::not_found("Experience"));
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Experience deleted successfully",
            })),
        )
            .into_response())
    }
}
