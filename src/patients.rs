//! Patient records, routed to a terapista and followed until payment.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::entity::{require, EntityKind, Facet, Note, PipelineRecord};
use crate::error::BoardError;
use crate::queries::sort::SortValue;
use crate::stage::{PatientStage, PipelineStage, StageTrack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub terapista: String,
    /// Value of the first session in euro.
    pub session_value: u32,
    #[serde(flatten)]
    pub(crate) track: StageTrack<PatientStage>,
    #[serde(default)]
    pub(crate) notes: Vec<Note>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPatient {
    pub name: String,
    pub city: String,
    pub email: Option<String>,
    pub terapista: String,
    pub session_value: u32,
}

impl Patient {
    pub fn create(fields: NewPatient) -> Result<Self, BoardError> {
        require(&fields.name, "name")?;

        Ok(Self {
            id: EntityKind::Patient.new_id(),
            name: fields.name,
            city: fields.city,
            email: fields.email,
            terapista: fields.terapista,
            session_value: fields.session_value,
            track: StageTrack::initial(),
            notes: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatientSortKey {
    Name,
    City,
    Terapista,
    SessionValue,
    DaysInStage,
    Stage,
}

impl PipelineRecord for Patient {
    type Stage = PatientStage;
    type SortKey = PatientSortKey;

    const KIND: EntityKind = EntityKind::Patient;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn track(&self) -> &StageTrack<PatientStage> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut StageTrack<PatientStage> {
        &mut self.track
    }

    fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.city.as_str(), self.terapista.as_str()]
    }

    fn sort_value(&self, key: PatientSortKey) -> SortValue {
        match key {
            PatientSortKey::Name => SortValue::text(&self.name),
            PatientSortKey::City => SortValue::text(&self.city),
            PatientSortKey::Terapista => SortValue::text(&self.terapista),
            PatientSortKey::SessionValue => SortValue::Number(self.session_value as f64),
            PatientSortKey::DaysInStage => SortValue::Number(self.track.days_in_stage() as f64),
            PatientSortKey::Stage => SortValue::Number(self.track.stage().ordinal() as f64),
        }
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::City => Some(self.city.as_str()),
            Facet::Owner => Some(self.terapista.as_str()),
            Facet::Specialization => None,
        }
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn owner(&self) -> Option<&str> {
        Some(self.terapista.as_str())
    }

    fn set_owner(&mut self, owner: &str) -> bool {
        self.terapista = owner.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let patient = Patient::create(NewPatient {
            name: "Sara Colombo".to_string(),
            terapista: "Dott.ssa Bianchi".to_string(),
            session_value: 60,
            ..Default::default()
        })
        .unwrap();

        assert!(patient.id.starts_with("pat-"));
        assert_eq!(patient.stage(), PatientStage::NewLeads);
        assert_eq!(patient.owner(), Some("Dott.ssa Bianchi"));
    }

    #[test]
    fn test_create_requires_name() {
        let err = Patient::create(NewPatient::default()).unwrap_err();
        assert!(matches!(err, BoardError::MissingField("name")));
    }

    #[test]
    fn test_patient_owner_facet_is_terapista() {
        let patient = Patient::create(NewPatient {
            name: "Paolo Ricci".to_string(),
            city: "Roma".to_string(),
            terapista: "Dott. Greco".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patient.facet(Facet::City), Some("Roma"));
        assert_eq!(patient.facet(Facet::Owner), Some("Dott. Greco"));
        assert_eq!(patient.facet(Facet::Specialization), None);
        assert_eq!(patient.rating(), None);
    }
}
