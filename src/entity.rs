//! Kind-agnostic record abstraction.
//!
//! Prospects, patients, setters and terapisti are structurally similar: an
//! id, a name, a stage/status from a closed enumeration, a day counter, an
//! optional owning agent and a notes log. [`PipelineRecord`] is the surface
//! the store, filters, metrics and bulk handlers work against, so each of
//! those is written once for all four kinds.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::queries::sort::SortValue;
use crate::stage::{PipelineStage, StageTrack};

/// The kind of record being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Prospect,
    Patient,
    Setter,
    Terapista,
}

impl EntityKind {
    /// Prefix used when minting ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EntityKind::Prospect => "prs",
            EntityKind::Patient => "pat",
            EntityKind::Setter => "set",
            EntityKind::Terapista => "ter",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Prospect => "prospect",
            EntityKind::Patient => "patient",
            EntityKind::Setter => "setter",
            EntityKind::Terapista => "terapista",
        }
    }

    /// Mint a fresh, never-reused id for this kind.
    pub fn new_id(&self) -> String {
        format!("{}-{}", self.id_prefix(), Uuid::new_v4())
    }
}

/// One entry of a record's append-only notes log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub text: String,
    pub created_at: String,
}

impl Note {
    pub fn now(text: &str) -> Self {
        Self {
            text: text.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Categorical attributes a filter can match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    City,
    /// Owning agent: setter for prospects, terapista for patients.
    Owner,
    Specialization,
}

/// Flat row handed to export and email sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id: String,
    pub kind: EntityKind,
    pub name: String,
    pub stage: &'static str,
    pub days_in_stage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Shared surface of every pipeline record.
pub trait PipelineRecord: Clone + std::fmt::Debug {
    type Stage: PipelineStage;
    /// Per-kind sortable columns, each mapped to a typed accessor.
    type SortKey: Copy + std::fmt::Debug;

    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn name(&self) -> &str;

    fn track(&self) -> &StageTrack<Self::Stage>;
    fn track_mut(&mut self) -> &mut StageTrack<Self::Stage>;

    fn notes(&self) -> &[Note];
    fn notes_mut(&mut self) -> &mut Vec<Note>;

    /// Fields searched by free text. Any match counts.
    fn searchable_fields(&self) -> Vec<&str>;

    fn sort_value(&self, key: Self::SortKey) -> SortValue;

    fn facet(&self, _facet: Facet) -> Option<&str> {
        None
    }

    fn rating(&self) -> Option<f64> {
        None
    }

    fn review_count(&self) -> Option<u32> {
        None
    }

    fn email(&self) -> Option<&str> {
        None
    }

    /// Owning agent (setter for prospects, terapista for patients).
    fn owner(&self) -> Option<&str> {
        None
    }

    /// Reassign the owning agent. Returns false for kinds without an owner.
    fn set_owner(&mut self, _owner: &str) -> bool {
        false
    }

    fn stage(&self) -> Self::Stage {
        self.track().stage()
    }

    fn days_in_stage(&self) -> u32 {
        self.track().days_in_stage()
    }

    fn add_note(&mut self, text: &str) {
        self.notes_mut().push(Note::now(text));
    }

    fn export_row(&self) -> ExportRow {
        ExportRow {
            id: self.id().to_string(),
            kind: Self::KIND,
            name: self.name().to_string(),
            stage: self.stage().as_str(),
            days_in_stage: self.days_in_stage(),
            owner: self.owner().map(str::to_string),
            city: self.facet(Facet::City).map(str::to_string),
            email: self.email().map(str::to_string),
        }
    }
}

/// Reject blank required fields at creation time.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), crate::error::BoardError> {
    if value.trim().is_empty() {
        return Err(crate::error::BoardError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_has_kind_prefix() {
        let id = EntityKind::Patient.new_id();
        assert!(id.starts_with("pat-"));
        assert_ne!(id, EntityKind::Patient.new_id());
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("Anna", "name").is_ok());
        let err = require("   ", "name").unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");
    }
}
