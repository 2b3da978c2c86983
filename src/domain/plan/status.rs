//! Display status derivation for plan actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display status of one action, derived from its dates and suppression flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Suppressed by the organization; hidden from the plan tables.
    Ignored,
    /// No dates set yet.
    NotStarted,
    /// Both dates set and the end date has passed.
    Completed,
    /// Anything in between.
    Pending,
}

impl ActionStatus {
    /// Derives the status from the suppression flag and the date pair.
    ///
    /// Total for every combination of present/absent dates; `today` is the
    /// current date truncated to day precision. Suppression wins over
    /// everything else.
    pub fn derive(
        suppressed: bool,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        if suppressed {
            return ActionStatus::Ignored;
        }
        match (start_date, end_date) {
            (None, None) => ActionStatus::NotStarted,
            (Some(_), Some(end)) if end < today => ActionStatus::Completed,
            _ => ActionStatus::Pending,
        }
    }

    /// Portuguese display label used in rendered documents.
    pub fn label(&self) -> &'static str {
        match self {
            ActionStatus::Ignored => "Ignorada",
            ActionStatus::NotStarted => "Não iniciada",
            ActionStatus::Completed => "Concluída",
            ActionStatus::Pending => "Pendente",
        }
    }

    /// Fixed fill color (RGB, 0.0–1.0) for the rendered status pill.
    pub fn pill_color(&self) -> (f32, f32, f32) {
        match self {
            ActionStatus::Ignored => (0.62, 0.62, 0.62),
            ActionStatus::NotStarted => (0.45, 0.55, 0.68),
            ActionStatus::Completed => (0.22, 0.60, 0.33),
            ActionStatus::Pending => (0.85, 0.60, 0.13),
        }
    }
}
