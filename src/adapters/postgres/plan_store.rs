//! PostgreSQL implementation of the PlanStore port.
//!
//! Template actions, override rows, evidence and the organization's
//! narrative columns all live here. Queries are plain SQL bound through
//! sqlx; row structs keep the mapping to domain types in one place.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, EvidenceId, OrganizationId, TemplateActionId, Timestamp, UserId,
};
use crate::domain::plan::{
    Evidence, EvidenceKind, NarrativeField, NarrativeKind, OverrideAction, TemplateAction,
};
use crate::ports::{OrganizationRecord, PlanStore};

/// PostgreSQL implementation of the PlanStore port.
#[derive(Clone)]
pub struct PostgresPlanStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresPlanStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresPlanStore")
            .field("pool", &"PgPool")
            .finish()
    }
}

impl PostgresPlanStore {
    /// Creates a new store backed by the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for the organization record.
#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: uuid::Uuid,
    name: String,
    assigned_technician_id: Option<uuid::Uuid>,
    draft_text: Option<String>,
    draft_updated_by: Option<uuid::Uuid>,
    draft_updated_at: Option<chrono::DateTime<chrono::Utc>>,
    synthetic_report_text: Option<String>,
    synthetic_report_updated_by: Option<uuid::Uuid>,
    synthetic_report_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Database row for the template catalog.
#[derive(Debug, sqlx::FromRow)]
struct TemplateActionRow {
    id: uuid::Uuid,
    category: String,
    title: String,
    subgroup: Option<String>,
    model_text: String,
    responsible_hint: Option<String>,
    resources_hint: Option<String>,
    method_hint: Option<String>,
    display_order: i32,
    active: bool,
}

/// Database row for per-organization override rows.
#[derive(Debug, sqlx::FromRow)]
struct OverrideRow {
    organization_id: uuid::Uuid,
    template_action_id: uuid::Uuid,
    narrative: Option<String>,
    responsible: Option<String>,
    start_date: Option<chrono::NaiveDate>,
    end_date: Option<chrono::NaiveDate>,
    method: Option<String>,
    resources: Option<String>,
    suppressed: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// Database row for evidence artifacts.
#[derive(Debug, sqlx::FromRow)]
struct EvidenceRow {
    id: uuid::Uuid,
    organization_id: uuid::Uuid,
    kind: String,
    original_filename: String,
    storage_path: String,
    caption: Option<String>,
    uploaded_by: uuid::Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
}

fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, err))
}

/// Parse the evidence kind column; unknown kinds degrade to photos so a
/// bad row never poisons the whole listing.
fn parse_evidence_kind(s: &str) -> EvidenceKind {
    match s {
        "attendance_list" => EvidenceKind::AttendanceList,
        _ => EvidenceKind::Photo,
    }
}

impl From<TemplateActionRow> for TemplateAction {
    fn from(row: TemplateActionRow) -> Self {
        TemplateAction {
            id: TemplateActionId::from_uuid(row.id),
            category: row.category,
            title: row.title,
            subgroup: row.subgroup,
            model_text: row.model_text,
            responsible_hint: row.responsible_hint,
            resources_hint: row.resources_hint,
            method_hint: row.method_hint,
            display_order: row.display_order,
            active: row.active,
        }
    }
}

impl From<OverrideRow> for OverrideAction {
    fn from(row: OverrideRow) -> Self {
        OverrideAction {
            organization_id: OrganizationId::from_uuid(row.organization_id),
            template_action_id: TemplateActionId::from_uuid(row.template_action_id),
            narrative: row.narrative,
            responsible: row.responsible,
            start_date: row.start_date,
            end_date: row.end_date,
            method: row.method,
            resources: row.resources,
            suppressed: row.suppressed,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

impl From<EvidenceRow> for Evidence {
    fn from(row: EvidenceRow) -> Self {
        Evidence {
            id: EvidenceId::from_uuid(row.id),
            organization_id: OrganizationId::from_uuid(row.organization_id),
            kind: parse_evidence_kind(&row.kind),
            original_filename: row.original_filename,
            storage_path: row.storage_path,
            caption: row.caption,
            uploaded_by: UserId::from_uuid(row.uploaded_by),
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl PlanStore for PostgresPlanStore {
    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationRecord>, DomainError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT
                id, name, assigned_technician_id,
                draft_text, draft_updated_by, draft_updated_at,
                synthetic_report_text, synthetic_report_updated_by,
                synthetic_report_updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find organization", e))?;

        Ok(row.map(|r| OrganizationRecord {
            id: OrganizationId::from_uuid(r.id),
            name: r.name,
            assigned_technician_id: r.assigned_technician_id.map(UserId::from_uuid),
            draft: NarrativeField {
                text: r.draft_text,
                updated_by: r.draft_updated_by.map(UserId::from_uuid),
                updated_at: r.draft_updated_at.map(Timestamp::from_datetime),
            },
            synthetic_report: NarrativeField {
                text: r.synthetic_report_text,
                updated_by: r.synthetic_report_updated_by.map(UserId::from_uuid),
                updated_at: r.synthetic_report_updated_at.map(Timestamp::from_datetime),
            },
        }))
    }

    async fn list_active_template_actions(&self) -> Result<Vec<TemplateAction>, DomainError> {
        let rows = sqlx::query_as::<_, TemplateActionRow>(
            r#"
            SELECT
                id, category, title, subgroup, model_text,
                responsible_hint, resources_hint, method_hint,
                display_order, active
            FROM template_actions
            WHERE active = TRUE
            ORDER BY display_order ASC, title ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list template actions", e))?;

        Ok(rows.into_iter().map(TemplateAction::from).collect())
    }

    async fn list_overrides(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<OverrideAction>, DomainError> {
        let rows = sqlx::query_as::<_, OverrideRow>(
            r#"
            SELECT
                organization_id, template_action_id, narrative, responsible,
                start_date, end_date, method, resources, suppressed,
                created_at, updated_at
            FROM plan_overrides
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list overrides", e))?;

        Ok(rows.into_iter().map(OverrideAction::from).collect())
    }

    async fn upsert_override_row(&self, row: &OverrideAction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plan_overrides (
                organization_id, template_action_id, narrative, responsible,
                start_date, end_date, method, resources, suppressed,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (organization_id, template_action_id) DO UPDATE SET
                narrative = EXCLUDED.narrative,
                responsible = EXCLUDED.responsible,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                method = EXCLUDED.method,
                resources = EXCLUDED.resources,
                suppressed = EXCLUDED.suppressed,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(row.organization_id.as_uuid())
        .bind(row.template_action_id.as_uuid())
        .bind(&row.narrative)
        .bind(&row.responsible)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.method)
        .bind(&row.resources)
        .bind(row.suppressed)
        .bind(row.created_at.as_datetime())
        .bind(row.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("upsert override", e))?;

        Ok(())
    }

    async fn delete_override_row(
        &self,
        organization_id: OrganizationId,
        template_action_id: TemplateActionId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM plan_overrides
            WHERE organization_id = $1 AND template_action_id = $2
            "#,
        )
        .bind(organization_id.as_uuid())
        .bind(template_action_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("delete override", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_evidence(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Evidence>, DomainError> {
        let rows = sqlx::query_as::<_, EvidenceRow>(
            r#"
            SELECT
                id, organization_id, kind, original_filename,
                storage_path, caption, uploaded_by, created_at
            FROM evidence
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list evidence", e))?;

        Ok(rows.into_iter().map(Evidence::from).collect())
    }

    async fn update_narrative_field(
        &self,
        organization_id: OrganizationId,
        kind: NarrativeKind,
        field: &NarrativeField,
    ) -> Result<(), DomainError> {
        let query = match kind {
            NarrativeKind::Draft => {
                r#"
                UPDATE organizations
                SET draft_text = $2, draft_updated_by = $3, draft_updated_at = $4
                WHERE id = $1
                "#
            }
            NarrativeKind::SyntheticReport => {
                r#"
                UPDATE organizations
                SET synthetic_report_text = $2,
                    synthetic_report_updated_by = $3,
                    synthetic_report_updated_at = $4
                WHERE id = $1
                "#
            }
        };

        let result = sqlx::query(query)
            .bind(organization_id.as_uuid())
            .bind(&field.text)
            .bind(field.updated_by.as_ref().map(|u| *u.as_uuid()))
            .bind(field.updated_at.as_ref().map(|t| *t.as_datetime()))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update narrative", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::OrganizationNotFound,
                format!("Organization not found: {}", organization_id),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
