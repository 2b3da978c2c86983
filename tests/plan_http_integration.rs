//! Integration tests for the plan HTTP endpoints.
//!
//! These tests exercise the full stack behind the router: in-memory plan
//! store, application handlers and the PDF renderer backed by a real
//! artifact directory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use plan_press::adapters::http::{plan_routes, PlanHandlers};
use plan_press::adapters::memory::InMemoryPlanStore;
use plan_press::adapters::pdf::PdfDocumentRenderer;
use plan_press::adapters::storage::LocalArtifactStore;
use plan_press::application::handlers::plan::{
    DeleteOverrideHandler, RenderDocumentHandler, ResolvePlanHandler, UpdateNarrativeHandler,
    UpsertOverrideHandler,
};
use plan_press::domain::foundation::{
    EvidenceId, OrganizationId, TemplateActionId, Timestamp, UserId,
};
use plan_press::domain::plan::{Evidence, EvidenceKind, NarrativeField, TemplateAction};
use plan_press::ports::{OrganizationRecord, PlanStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn template(category: &str, title: &str, order: i32) -> TemplateAction {
    TemplateAction {
        id: TemplateActionId::new(),
        category: category.to_string(),
        title: title.to_string(),
        subgroup: None,
        model_text: "Texto modelo da ação.".to_string(),
        responsible_hint: Some("Diretoria".to_string()),
        resources_hint: None,
        method_hint: None,
        display_order: order,
        active: true,
    }
}

struct TestApp {
    router: Router,
    store: Arc<InMemoryPlanStore>,
    org_id: OrganizationId,
    // Keeps the artifact directory alive for the duration of the test.
    _artifact_dir: tempfile::TempDir,
}

async fn spawn_app(templates: Vec<TemplateAction>) -> TestApp {
    let store = Arc::new(InMemoryPlanStore::new());
    let org_id = OrganizationId::new();
    store
        .insert_organization(OrganizationRecord {
            id: org_id,
            name: "Associação Quilombola Boa Vista".to_string(),
            assigned_technician_id: Some(UserId::new()),
            draft: NarrativeField::default(),
            synthetic_report: NarrativeField::default(),
        })
        .await;
    for t in templates {
        store.insert_template(t).await;
    }

    let artifact_dir = tempfile::tempdir().unwrap();
    let artifacts = Arc::new(LocalArtifactStore::new(artifact_dir.path()));
    let renderer = Arc::new(PdfDocumentRenderer::new(artifacts));

    let plan_store: Arc<dyn PlanStore> = store.clone();
    let handlers = PlanHandlers::new(
        Arc::new(ResolvePlanHandler::new(plan_store.clone())),
        Arc::new(UpsertOverrideHandler::new(plan_store.clone())),
        Arc::new(DeleteOverrideHandler::new(plan_store.clone())),
        Arc::new(UpdateNarrativeHandler::new(plan_store.clone())),
        Arc::new(RenderDocumentHandler::new(plan_store, renderer)),
    );

    TestApp {
        router: plan_routes(handlers),
        store,
        org_id,
        _artifact_dir: artifact_dir,
    }
}

async fn send(router: &Router, request: Request<Body>) -> axum::response::Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    user_id: Option<UserId>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    let response = send(
        router,
        builder.body(Body::from(body.to_string())).unwrap(),
    )
    .await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Override journey
// =============================================================================

#[tokio::test]
async fn override_journey_edit_then_reset() {
    let app = spawn_app(vec![
        template("GOVERNANCA", "Elaborar estatuto", 1),
        template("GOVERNANCA", "Realizar assembleia", 2),
    ])
    .await;
    let plan_uri = format!("/api/organizations/{}/plan", app.org_id);

    // Fresh plan: everything comes from the template catalog.
    let (status, plan) = get_json(&app.router, &plan_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["statistics"]["total"], 2);
    assert_eq!(plan["statistics"]["answered"], 0);
    let action = &plan["groups"][0]["actions"][0];
    assert_eq!(action["edited"], false);
    assert_eq!(action["status"], "not_started");
    let action_id = action["template_action_id"].as_str().unwrap().to_string();

    // Edit one action.
    let (status, stored) = send_json(
        &app.router,
        "PATCH",
        &format!("/api/organizations/{}/actions/{}", app.org_id, action_id),
        json!({
            "narrative": "Contratar assessoria jurídica para o estatuto.",
            "responsible": "Comissão de documentação",
            "start_date": "2024-03-01",
            "end_date": "2024-09-30"
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["template_action_id"], action_id.as_str());
    assert_eq!(stored["suppressed"], false);

    // The plan now reflects the override.
    let (_, plan) = get_json(&app.router, &plan_uri).await;
    let action = &plan["groups"][0]["actions"][0];
    assert_eq!(action["edited"], true);
    assert_eq!(action["answered"], true);
    assert_eq!(
        action["narrative"],
        "Contratar assessoria jurídica para o estatuto."
    );
    // Template data stays visible alongside the edits.
    assert_eq!(action["model_text"], "Texto modelo da ação.");
    assert_eq!(plan["statistics"]["answered"], 1);
    assert_eq!(app.store.override_count().await, 1);

    // Reset to template.
    let (status, deleted) = send_json(
        &app.router,
        "DELETE",
        &format!("/api/organizations/{}/actions/{}", app.org_id, action_id),
        json!({}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["removed"], true);
    assert_eq!(app.store.override_count().await, 0);

    let (_, plan) = get_json(&app.router, &plan_uri).await;
    let action = &plan["groups"][0]["actions"][0];
    assert_eq!(action["edited"], false);
    assert_eq!(action["narrative"], serde_json::Value::Null);

    // A second delete is a no-op, not an error.
    let (status, deleted) = send_json(
        &app.router,
        "DELETE",
        &format!("/api/organizations/{}/actions/{}", app.org_id, action_id),
        json!({}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["removed"], false);
}

#[tokio::test]
async fn suppressed_action_counts_as_ignored() {
    let app = spawn_app(vec![
        template("SAUDE", "Campanha de vacinação", 1),
        template("SAUDE", "Mutirão de limpeza", 2),
    ])
    .await;
    let plan_uri = format!("/api/organizations/{}/plan", app.org_id);

    let (_, plan) = get_json(&app.router, &plan_uri).await;
    let action_id = plan["groups"][0]["actions"][0]["template_action_id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = send_json(
        &app.router,
        "PATCH",
        &format!("/api/organizations/{}/actions/{}", app.org_id, action_id),
        json!({ "suppressed": true }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, plan) = get_json(&app.router, &plan_uri).await;
    assert_eq!(plan["statistics"]["ignored"], 1);
    let action = &plan["groups"][0]["actions"][0];
    assert_eq!(action["suppressed"], true);
    assert_eq!(action["status"], "ignored");
}

#[tokio::test]
async fn patching_an_unknown_template_action_is_not_found() {
    let app = spawn_app(vec![template("GOVERNANCA", "Elaborar estatuto", 1)]).await;

    let (status, body) = send_json(
        &app.router,
        "PATCH",
        &format!(
            "/api/organizations/{}/actions/{}",
            app.org_id,
            TemplateActionId::new()
        ),
        json!({ "narrative": "texto" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Narrative fields
// =============================================================================

#[tokio::test]
async fn narrative_fields_record_the_editor() {
    let app = spawn_app(vec![template("GOVERNANCA", "Elaborar estatuto", 1)]).await;
    let editor = UserId::new();

    let (status, body) = send_json(
        &app.router,
        "PUT",
        &format!("/api/organizations/{}/narratives/draft", app.org_id),
        json!({ "text": "Diagnóstico inicial da comunidade." }),
        Some(editor),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Diagnóstico inicial da comunidade.");
    assert_eq!(body["updated_by"], editor.to_string());

    let (status, body) = send_json(
        &app.router,
        "PUT",
        &format!(
            "/api/organizations/{}/narratives/synthetic_report",
            app.org_id
        ),
        json!({ "text": "Relatório sintético." }),
        Some(editor),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Relatório sintético.");

    // Both fields show up in the plan view.
    let (_, plan) = get_json(
        &app.router,
        &format!("/api/organizations/{}/plan", app.org_id),
    )
    .await;
    assert_eq!(plan["draft"]["text"], "Diagnóstico inicial da comunidade.");
    assert_eq!(plan["synthetic_report"]["text"], "Relatório sintético.");
}

#[tokio::test]
async fn narrative_update_requires_an_editor_header() {
    let app = spawn_app(vec![]).await;

    let (status, body) = send_json(
        &app.router,
        "PUT",
        &format!("/api/organizations/{}/narratives/draft", app.org_id),
        json!({ "text": "sem editor" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_narrative_field_is_rejected() {
    let app = spawn_app(vec![]).await;

    let (status, body) = send_json(
        &app.router,
        "PUT",
        &format!("/api/organizations/{}/narratives/minutes", app.org_id),
        json!({ "text": "ata" }),
        Some(UserId::new()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// =============================================================================
// Document rendering
// =============================================================================

async fn fetch_document(app: &TestApp) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = send(
        &app.router,
        Request::builder()
            .uri(format!("/api/organizations/{}/plan/document", app.org_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes.to_vec())
}

fn count_pages(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page ";
    pdf.windows(needle.len()).filter(|w| w == needle).count()
}

#[tokio::test]
async fn document_is_a_streamed_pdf() {
    let app = spawn_app(vec![
        template("GOVERNANCA", "Elaborar estatuto", 1),
        template("SAUDE", "Campanha de vacinação", 2),
    ])
    .await;

    let (status, content_type, bytes) = fetch_document(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert!(bytes.starts_with(b"%PDF-"));
    let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]).to_string();
    assert!(tail.trim_end().ends_with("%%EOF"));
    assert!(count_pages(&bytes) >= 1);
}

#[tokio::test]
async fn long_plans_flow_across_pages() {
    let mut templates = Vec::new();
    for i in 0..60 {
        templates.push(template("GOVERNANCA", &format!("Ação {}", i), i));
    }
    let app = spawn_app(templates).await;

    let (status, _, bytes) = fetch_document(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert!(count_pages(&bytes) > 1);
}

#[tokio::test]
async fn evidence_photos_render_into_the_document() {
    let app = spawn_app(vec![template("GOVERNANCA", "Elaborar estatuto", 1)]).await;
    let uploader = UserId::new();

    // Real decodable images on disk, plus one missing artifact that must
    // degrade to a placeholder instead of failing the document.
    std::fs::create_dir_all(app._artifact_dir.path().join("fotos")).unwrap();
    for i in 0..3 {
        let path = app
            ._artifact_dir
            .path()
            .join(format!("fotos/foto-{}.png", i));
        image::RgbImage::from_pixel(8, 8, image::Rgb([200, 30, 30]))
            .save(&path)
            .unwrap();
        app.store
            .insert_evidence(Evidence {
                id: EvidenceId::new(),
                organization_id: app.org_id,
                kind: EvidenceKind::Photo,
                original_filename: format!("foto-{}.png", i),
                storage_path: format!("fotos/foto-{}.png", i),
                caption: Some(format!("Oficina {}", i)),
                uploaded_by: uploader,
                created_at: Timestamp::now(),
            })
            .await;
    }
    app.store
        .insert_evidence(Evidence {
            id: EvidenceId::new(),
            organization_id: app.org_id,
            kind: EvidenceKind::Photo,
            original_filename: "perdida.jpg".to_string(),
            storage_path: "fotos/perdida.jpg".to_string(),
            caption: None,
            uploaded_by: uploader,
            created_at: Timestamp::now(),
        })
        .await;

    let (status, _, bytes) = fetch_document(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"%PDF-"));
    // Three decoded photos become image XObjects in the output.
    let needle = b"/Subtype /Image";
    let images = bytes.windows(needle.len()).filter(|w| w == needle).count();
    assert_eq!(images, 3);
}

// =============================================================================
// Not-found mapping
// =============================================================================

#[tokio::test]
async fn unknown_organization_maps_to_not_found() {
    let app = spawn_app(vec![]).await;
    let other = OrganizationId::new();

    let (status, body) =
        get_json(&app.router, &format!("/api/organizations/{}/plan", other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let response = send(
        &app.router,
        Request::builder()
            .uri(format!("/api/organizations/{}/plan/document", other))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
