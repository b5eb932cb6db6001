// ABOUTME: Contact-form route handlers: public submission, admin message management
// ABOUTME: Persists first, then best-effort email notification that never fails the request
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Contact routes
//!
//! The submission endpoint is public. It persists the message, then attempts
//! the admin notification (and optional auto-reply) — email failures are
//! logged and the request still succeeds. Message management endpoints run
//! behind the admin gate; status transitions stamp their timestamps in the
//! database write path.

use crate::{
    database::{ContactFilter, ContactUpdate},
    errors::AppError,
    middleware::guards::require_permission,
    models::{ContactMessage, ContactPriority, ContactStatus, Permission},
    pagination::{PageQuery, Pagination},
    routes::is_valid_email,
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Contact-form submission request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
}

/// Admin message listing query
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Admin message update request
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateMessageRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn parse_status(raw: &str) -> Result<ContactStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid message status: {raw}")))
}

fn parse_priority(raw: &str) -> Result<ContactPriority, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid message priority: {raw}")))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid message id: {raw}")))
}

/// Best-effort client address from proxy headers
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(ToOwned::to_owned)
        })
}

/// Contact routes handler
pub struct ContactRoutes;

impl ContactRoutes {
    /// Create all contact routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/portfolio/contact", post(Self::handle_submit))
            .route(
                "/api/v1/portfolio/admin/messages",
                get(Self::handle_list_messages),
            )
            .route(
                "/api/v1/portfolio/admin/messages/:id",
                get(Self::handle_get_message),
            )
            .route(
                "/api/v1/portfolio/admin/messages/:id",
                patch(Self::handle_update_message),
            )
            .route(
                "/api/v1/portfolio/admin/messages/:id/read",
                patch(Self::handle_mark_read),
            )
            .route(
                "/api/v1/portfolio/admin/messages/:id",
                delete(Self::handle_delete_message),
            )
            .with_state(resources)
    }

    /// Handle POST /api/v1/portfolio/contact - public submission
    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SubmitContactRequest>,
    ) -> Result<Response, AppError> {
        let required = [
            &request.name,
            &request.email,
            &request.subject,
            &request.message,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::missing_field(
                "Name, email, subject, and message are required",
            ));
        }
        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Please enter a valid email"));
        }

        let user_agent = headers
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(ToOwned::to_owned);

        let now = Utc::now();
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: request.name.trim().to_owned(),
            email: request.email.trim().to_lowercase(),
            subject: request.subject.trim().to_owned(),
            message: request.message.trim().to_owned(),
            phone: request.phone.map(|v| v.trim().to_owned()),
            company: request.company.map(|v| v.trim().to_owned()),
            project_type: request.project_type,
            budget: request.budget,
            timeline: request.timeline,
            source: "Website".into(),
            status: ContactStatus::New,
            priority: ContactPriority::Medium,
            tags: vec![],
            notes: None,
            ip_address: client_ip(&headers),
            user_agent,
            read_at: None,
            replied_at: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
        };

        resources
            .database
            .create_contact(&message)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!("Contact message {} stored from {}", message.id, message.email);

        // Email is best-effort: a failed send never fails the submission
        let email_sent = match &resources.mailer {
            Some(mailer) => mailer.notify_contact_submission(&message).await,
            None => false,
        };

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Thank you for your message! I'll get back to you soon.",
                "data": {
                    "contactId": message.id,
                    "emailSent": email_sent,
                    "status": message.status,
                },
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/portfolio/admin/messages
    async fn handle_list_messages(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListMessagesQuery>,
    ) -> Result<Response, AppError> {
        let _context = resources.admin_gate.authenticate(&headers).await?;

        let status = match query.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_status(raw)?),
        };
        let priority = match query.priority.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(parse_priority(raw)?),
        };

        let filter = ContactFilter {
            status,
            priority,
            project_type: query.project_type.filter(|s| !s.is_empty() && s != "all"),
            search: query.search.filter(|s| !s.trim().is_empty()),
        };
        let page = PageQuery {
            page: query.page,
            limit: query.limit,
        };

        let (messages, total) = resources
            .database
            .list_contacts(&filter, page)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        let stats = resources
            .database
            .contact_stats()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "messages": messages,
                    "pagination": Pagination::new(page, total),
                    "stats": stats,
                },
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/portfolio/admin/messages/:id
    async fn handle_get_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let _context = resources.admin_gate.authenticate(&headers).await?;

        let id = parse_id(&id)?;
        let message = resources
            .database
            .get_contact(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Message"))?;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "data": message })),
        )
            .into_response())
    }

    /// Handle PATCH /api/v1/portfolio/admin/messages/:id
    async fn handle_update_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateMessageRequest>,
    ) -> Result<Response, AppError> {
        let _context = resources.admin_gate.authenticate(&headers).await?;

        let id = parse_id(&id)?;
        let status = match request.status.as_deref() {
            None => None,
            Some(raw) => Some(parse_status(raw)?),
        };
        let priority = match request.priority.as_deref() {
            None => None,
            Some(raw) => Some(parse_priority(raw)?),
        };

        let update = ContactUpdate {
            status,
            priority,
            notes: request.notes,
            tags: request.tags,
        };

        let message = resources
            .database
            .update_contact(id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Message"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Message updated successfully",
                "data": message,
            })),
        )
            .into_response())
    }

    /// Handle PATCH /api/v1/portfolio/admin/messages/:id/read
    async fn handle_mark_read(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let _context = resources.admin_gate.authenticate(&headers).await?;

        let id = parse_id(&id)?;
        let update = ContactUpdate {
            status: Some(ContactStatus::Read),
            ..ContactUpdate::default()
        };

        let message = resources
            .database
            .update_contact(id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Message"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Message marked as read",
                "data": message,
            })),
        )
            .into_response())
    }

    /// Handle DELETE /api/v1/portfolio/admin/messages/:id
    async fn handle_delete_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let context = resources.admin_gate.authenticate(&headers).await?;
        require_permission(&context, Permission::Delete)?;

        let id = parse_id(&id)?;
        let removed = resources
            .database
            .delete_contact(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !removed {
            return Err(AppError::not_found("Message"));
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Message deleted successfully",
            })),
        )
            .into_response())
    }
}
