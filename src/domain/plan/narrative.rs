//! Free-text narrative fields on the organization record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Which of the two narrative fields is being addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    /// Working draft ("rascunho").
    Draft,
    /// Synthetic report.
    SyntheticReport,
}

impl NarrativeKind {
    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeKind::Draft => "draft",
            NarrativeKind::SyntheticReport => "synthetic_report",
        }
    }

    /// Section title in rendered documents.
    pub fn title(&self) -> &'static str {
        match self {
            NarrativeKind::Draft => "Rascunho",
            NarrativeKind::SyntheticReport => "Relatório Sintético",
        }
    }
}

impl std::str::FromStr for NarrativeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" | "rascunho" => Ok(NarrativeKind::Draft),
            "synthetic_report" => Ok(NarrativeKind::SyntheticReport),
            _ => Err(()),
        }
    }
}

/// One narrative field with its edit trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrativeField {
    pub text: Option<String>,
    pub updated_by: Option<UserId>,
    pub updated_at: Option<Timestamp>,
}

impl NarrativeField {
    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.text
            .as_deref()
            .map(|t| t.trim().is_empty())
            .unwrap_or(true)
    }
}
