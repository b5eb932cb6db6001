// ABOUTME: Skill route handlers: public listing and admin CRUD
// ABOUTME: Skill names are unique; writes run behind permission guards
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Skill routes

use crate::{
    database::{SkillFilter, SkillUpdate},
    errors::AppError,
    middleware::guards::require_permission,
    models::{Certification, Permission, Skill, SkillCategory, SkillStatus},
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Default display color for skills
const DEFAULT_SKILL_COLOR: &str = "#3b82f6";

/// Public listing query
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListSkillsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
}

/// Skill create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: String,
    pub proficiency: u8,
    pub years_of_experience: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub status: Option<String>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    pub sort_order: Option<i64>,
}

/// Skill update request; absent fields are left untouched
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub proficiency: Option<u8>,
    pub years_of_experience: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub sort_order: Option<i64>,
}

/// Hex color shape check ("#abc" or "#a1b2c3")
fn is_valid_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn parse_category(raw: &str) -> Result<SkillCategory, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid skill category: {raw}")))
}

fn parse_status(raw: &str) -> Result<SkillStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid skill status: {raw}")))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid skill id: {raw}")))
}

/// Skill routes handler
pub struct SkillRoutes;

impl SkillRoutes {
    /// Create all skill routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/portfolio/skills", get(Self::handle_list))
            .route("/api/v1/portfolio/admin/skills", post(Self::handle_create))
            .route(
                "/api/v1/portfolio/admin/skills/:id",
                put(Self::handle_update),
            )
            .route(
                "/api/v1/portfolio/admin/skills/:id",
                delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /api/v1/portfolio/skills - public listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListSkillsQuery>,
    ) -> Result<Response, AppError> {
        let category = match query.category.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_category(raw)?),
        };
        let status = match query.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        let filter = SkillFilter {
            category,
            status,
            featured: query.featured.filter(|&f| f),
        };

        let skills = resources
            .database
            .list_skills(&filter)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        // Attach the derived proficiency tier alongside each skill
        let items: Vec<serde_json::Value> = skills
            .iter()
            .map(|skill| {
                let mut value = serde_json::to_value(skill).unwrap_or_default();
                if let Some(map) = value.as_object_mut() {
                    map.insert(
                        "proficiencyLevel".into(),
                        json!(skill.proficiency_level()),
                    );
                }
                value
            })
            .collect();

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "skills": items } })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/portfolio/admin/skills
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateSkillRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Write)?;

        if request.name.trim().is_empty() {
            return Err(AppError::missing_field("Skill name is required"));
        }
        if request.proficiency > 100 {
            return Err(AppError::invalid_input(
                "Proficiency must be between 0 and 100",
            ));
        }

        let color = match request.color {
            None => DEFAULT_SKILL_COLOR.to_owned(),
            Some(raw) => {
                if !is_valid_hex_color(&raw) {
                    return Err(AppError::invalid_input("Color must be a valid hex color"));
                }
                raw
            }
        };

        let status = match request.status.as_deref() {
            None | Some("") => SkillStatus::Active,
            Some(raw) => parse_status(raw)?,
        };

        if resources
            .database
            .get_skill_by_name(request.name.trim())
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_some()
        {
            return Err(AppError::conflict("Skill with this name already exists"));
        }

        let now = Utc::now();
        let skill = Skill {
            id: Uuid::new_v4(),
            name: request.name.trim().to_owned(),
            category: parse_category(&request.category)?,
            proficiency: request.proficiency,
            years_of_experience: request.years_of_experience,
            description: request.description,
            icon: request.icon,
            color,
            featured: request.featured,
            status,
            certifications: request.certifications,
            sort_order: request.sort_order.unwrap_or(0),
            created_by: context.id,
            created_at: now,
            updated_at: now,
        };

        resources
            .database
            .create_skill(&skill)
            .await
            .map_err(|e| crate::routes::map_insert_error(e, "Skill with this name already exists"))?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Skill created successfully",
                "data": skill,
            })),
        )
            .into_response())
    }

    /// Handle PUT /api/v1/portfolio/admin/skills/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateSkillRequest>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Write)?;

        let id = parse_id(&id)?;

        if let Some(p) = request.proficiency {
            if p > 100 {
                return Err(AppError::invalid_input(
                    "Proficiency must be between 0 and 100",
                ));
            }
        }
        if let Some(color) = &request.color {
            if !is_valid_hex_color(color) {
                return Err(AppError::invalid_input("Color must be a valid hex color"));
            }
        }

        let category = match request.category.as_deref() {
            None => None,
            Some(raw) => Some(parse_category(raw)?),
        };
        let status = match request.status.as_deref() {
            None => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        let update = SkillUpdate {
            name: request.name,
            category,
            proficiency: request.proficiency,
            years_of_experience: request.years_of_experience,
            description: request.description,
            icon: request.icon,
            color: request.color,
            featured: request.featured,
            status,
            sort_order: request.sort_order,
        };

        let skill = resources
            .database
            .update_skill(id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Skill"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Skill updated successfully",
                "data": skill,
            })),
        )
            .into_response())
    }

    /// Handle DELETE /api/v1/portfolio/admin/skills/:id
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
            .delete_skill(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !removed {
            return Err(AppError::not_found("Skill"));
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Skill deleted successfully",
            })),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_check() {
        assert!(is_valid_hex_color("#3b82f6"));
        assert!(is_valid_hex_color("#abc"));
        assert!(!is_valid_hex_color("3b82f6"));
        assert!(!is_valid_hex_color("#12345"));
        assert!(!is_valid_hex_color("#xyzxyz"));
    }
}
