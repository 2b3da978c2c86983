//! HTTP handlers for plan endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::application::handlers::plan::{
    DeleteOverrideCommand, DeleteOverrideError, DeleteOverrideHandler, RenderDocumentCommand,
    RenderDocumentError, RenderDocumentHandler, ResolvePlanError, ResolvePlanHandler,
    ResolvePlanQuery, UpdateNarrativeCommand, UpdateNarrativeError, UpdateNarrativeHandler,
    UpsertOverrideCommand, UpsertOverrideError, UpsertOverrideHandler,
};
use crate::domain::foundation::{OrganizationId, TemplateActionId, UserId};
use crate::domain::plan::NarrativeKind;

use super::dto::{
    DeleteOverrideResponse, ErrorResponse, NarrativeResponse, OverrideResponse, PlanResponse,
    UpdateNarrativeRequest, UpsertOverrideRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PlanHandlers {
    resolve_handler: Arc<ResolvePlanHandler>,
    upsert_handler: Arc<UpsertOverrideHandler>,
    delete_handler: Arc<DeleteOverrideHandler>,
    narrative_handler: Arc<UpdateNarrativeHandler>,
    render_handler: Arc<RenderDocumentHandler>,
}

impl PlanHandlers {
    pub fn new(
        resolve_handler: Arc<ResolvePlanHandler>,
        upsert_handler: Arc<UpsertOverrideHandler>,
        delete_handler: Arc<DeleteOverrideHandler>,
        narrative_handler: Arc<UpdateNarrativeHandler>,
        render_handler: Arc<RenderDocumentHandler>,
    ) -> Self {
        Self {
            resolve_handler,
            upsert_handler,
            delete_handler,
            narrative_handler,
            render_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Editor extractor
// ════════════════════════════════════════════════════════════════════════════

/// Extractor reading the acting editor from the `X-User-Id` header.
///
/// Authentication itself happens upstream; this service only records who
/// made the edit.
#[derive(Debug, Clone)]
pub struct EditorId(pub UserId);

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for EditorId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("X-User-Id")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.parse::<uuid::Uuid>().ok());

        match header {
            Some(id) => Ok(EditorId(UserId::from_uuid(id))),
            None => Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(
                    "Missing or invalid X-User-Id header",
                )),
            )
                .into_response()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/organizations/:id/plan - Resolved plan view
pub async fn get_plan(
    State(handlers): State<PlanHandlers>,
    Path(organization_id): Path<uuid::Uuid>,
) -> Response {
    let query = ResolvePlanQuery {
        organization_id: OrganizationId::from_uuid(organization_id),
    };

    match handlers.resolve_handler.handle(query).await {
        Ok(plan) => {
            let response = PlanResponse::from_plan(&plan, Utc::now().date_naive());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(ResolvePlanError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Organization", &id.to_string())),
        )
            .into_response(),
        Err(ResolvePlanError::Infrastructure(msg)) => internal_error(&msg),
    }
}

/// PATCH /api/organizations/:id/actions/:template_action_id - Upsert override
pub async fn patch_action(
    State(handlers): State<PlanHandlers>,
    Path((organization_id, template_action_id)): Path<(uuid::Uuid, uuid::Uuid)>,
    Json(req): Json<UpsertOverrideRequest>,
) -> Response {
    let cmd = UpsertOverrideCommand {
        organization_id: OrganizationId::from_uuid(organization_id),
        template_action_id: TemplateActionId::from_uuid(template_action_id),
        patch: req.into_patch(),
    };

    match handlers.upsert_handler.handle(cmd).await {
        Ok(row) => (StatusCode::OK, Json(OverrideResponse::from(row))).into_response(),
        Err(UpsertOverrideError::OrganizationNotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Organization", &id.to_string())),
        )
            .into_response(),
        Err(UpsertOverrideError::TemplateActionNotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Template action", &id.to_string())),
        )
            .into_response(),
        Err(UpsertOverrideError::Infrastructure(msg)) => internal_error(&msg),
    }
}

/// DELETE /api/organizations/:id/actions/:template_action_id - Reset to template
pub async fn delete_action(
    State(handlers): State<PlanHandlers>,
    Path((organization_id, template_action_id)): Path<(uuid::Uuid, uuid::Uuid)>,
) -> Response {
    let cmd = DeleteOverrideCommand {
        organization_id: OrganizationId::from_uuid(organization_id),
        template_action_id: TemplateActionId::from_uuid(template_action_id),
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteOverrideResponse {
                removed: result.removed,
            }),
        )
            .into_response(),
        Err(DeleteOverrideError::OrganizationNotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Organization", &id.to_string())),
        )
            .into_response(),
        Err(DeleteOverrideError::Infrastructure(msg)) => internal_error(&msg),
    }
}

/// PUT /api/organizations/:id/narratives/:field - Update narrative field
pub async fn put_narrative(
    State(handlers): State<PlanHandlers>,
    Path((organization_id, field)): Path<(uuid::Uuid, String)>,
    EditorId(editor): EditorId,
    Json(req): Json<UpdateNarrativeRequest>,
) -> Response {
    let Ok(kind) = field.parse::<NarrativeKind>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!(
                "Unknown narrative field: {}",
                field
            ))),
        )
            .into_response();
    };

    let cmd = UpdateNarrativeCommand {
        organization_id: OrganizationId::from_uuid(organization_id),
        kind,
        text: req.text,
        updated_by: editor,
    };

    match handlers.narrative_handler.handle(cmd).await {
        Ok(stored) => {
            let response = NarrativeResponse::from(&stored);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(UpdateNarrativeError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Organization", &id.to_string())),
        )
            .into_response(),
        Err(UpdateNarrativeError::Infrastructure(msg)) => internal_error(&msg),
    }
}

/// GET /api/organizations/:id/plan/document - Streamed PDF download
pub async fn get_plan_document(
    State(handlers): State<PlanHandlers>,
    Path(organization_id): Path<uuid::Uuid>,
) -> Response {
    let cmd = RenderDocumentCommand {
        organization_id: OrganizationId::from_uuid(organization_id),
    };

    match handlers.render_handler.handle(cmd).await {
        Ok(result) => {
            let disposition = format!("attachment; filename=\"{}\"", result.filename);
            let stream = futures::stream::unfold(result.stream, |mut rx| async move {
                rx.recv().await.map(|chunk| (chunk, rx))
            });

            let built = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, result.content_type)
                .header(header::CONTENT_DISPOSITION, disposition)
                .body(Body::from_stream(stream));

            match built {
                Ok(response) => response,
                Err(e) => internal_error(&e.to_string()),
            }
        }
        Err(RenderDocumentError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Organization", &id.to_string())),
        )
            .into_response(),
        Err(RenderDocumentError::Infrastructure(msg)) => internal_error(&msg),
    }
}

fn internal_error(message: &str) -> Response {
    tracing::error!(error = %message, "Plan endpoint failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("Internal server error")),
    )
        .into_response()
}
