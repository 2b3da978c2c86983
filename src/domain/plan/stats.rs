//! Aggregate statistics for the summary strip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ActionStatus, CompleteAction, Evidence, EvidenceKind};

/// Counts projected from the full action set and evidence list.
///
/// Pure projection: suppressed actions are counted in `total` and in the
/// `ignored` bucket even though the tables hide them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStatistics {
    pub total: usize,
    pub answered: usize,
    pub ignored: usize,
    pub not_started: usize,
    pub completed: usize,
    pub pending: usize,
    pub photos: usize,
    pub attendance_lists: usize,
}

impl PlanStatistics {
    /// Projects the counts for one plan snapshot.
    pub fn project(actions: &[CompleteAction], evidence: &[Evidence], today: NaiveDate) -> Self {
        let mut stats = Self {
            total: actions.len(),
            ..Self::default()
        };

        for action in actions {
            if action.is_answered() {
                stats.answered += 1;
            }
            match action.status(today) {
                ActionStatus::Ignored => stats.ignored += 1,
                ActionStatus::NotStarted => stats.not_started += 1,
                ActionStatus::Completed => stats.completed += 1,
                ActionStatus::Pending => stats.pending += 1,
            }
        }

        for item in evidence {
            match item.kind {
                EvidenceKind::Photo => stats.photos += 1,
                EvidenceKind::AttendanceList => stats.attendance_lists += 1,
            }
        }

        stats
    }

    /// One-line summary used by the rendered summary strip.
    pub fn summary_line(&self) -> String {
        format!(
            "Ações respondidas: {}/{}  ·  Concluídas: {}  ·  Pendentes: {}  ·  Não iniciadas: {}  ·  Ignoradas: {}  ·  Fotos: {}  ·  Listas de presença: {}",
            self.answered,
            self.total,
            self.completed,
            self.pending,
            self.not_started,
            self.ignored,
            self.photos,
            self.attendance_lists,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{
        EvidenceId, OrganizationId, TemplateActionId, Timestamp, UserId,
    };
    use crate::domain::plan::{OverrideAction, TemplateAction};

    fn template(order: i32) -> TemplateAction {
        TemplateAction {
            id: TemplateActionId::new(),
            category: "GERAL".to_string(),
            title: format!("Ação {}", order),
            subgroup: None,
            model_text: String::new(),
            responsible_hint: None,
            resources_hint: None,
            method_hint: None,
            display_order: order,
            active: true,
        }
    }

    fn suppressed_action() -> CompleteAction {
        let t = template(1);
        let edits = OverrideAction {
            organization_id: OrganizationId::new(),
            template_action_id: t.id,
            narrative: Some("respondida".to_string()),
            responsible: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            method: None,
            resources: None,
            suppressed: true,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        CompleteAction::resolve(t, Some(edits))
    }

    fn photo() -> Evidence {
        Evidence {
            id: EvidenceId::new(),
            organization_id: OrganizationId::new(),
            kind: EvidenceKind::Photo,
            original_filename: "foto.jpg".to_string(),
            storage_path: "p/foto.jpg".to_string(),
            caption: None,
            uploaded_by: UserId::new(),
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn unanswered_plan_is_all_not_started() {
        let actions: Vec<CompleteAction> = (0..5)
            .map(|i| CompleteAction::resolve(template(i), None))
            .collect();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let stats = PlanStatistics::project(&actions, &[], today);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.answered, 0);
        assert_eq!(stats.not_started, 5);
        assert_eq!(stats.completed, 0);
    }

    #[test]
    fn suppressed_actions_stay_in_raw_totals() {
        let actions = vec![suppressed_action(), CompleteAction::resolve(template(2), None)];
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let stats = PlanStatistics::project(&actions, &[], today);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.ignored, 1);
        // Suppressed but filled-in actions still count as answered.
        assert_eq!(stats.answered, 1);
    }

    #[test]
    fn evidence_counts_split_by_kind() {
        let mut list_item = photo();
        list_item.kind = EvidenceKind::AttendanceList;
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let stats = PlanStatistics::project(&[], &[photo(), photo(), list_item], today);
        assert_eq!(stats.photos, 2);
        assert_eq!(stats.attendance_lists, 1);
    }

    #[test]
    fn summary_line_mentions_every_count() {
        let stats = PlanStatistics {
            total: 10,
            answered: 4,
            ..Default::default()
        };
        let line = stats.summary_line();
        assert!(line.contains("4/10"));
        assert!(line.contains("Fotos"));
    }
}
