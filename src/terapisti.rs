//! Terapista records: therapists already active on the platform.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::entity::{require, EntityKind, Facet, Note, PipelineRecord};
use crate::error::BoardError;
use crate::queries::sort::SortValue;
use crate::stage::{PipelineStage, StageTrack, TerapistaStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terapista {
    pub id: String,
    pub name: String,
    pub business_name: String,
    pub city: String,
    pub specialization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub rating: f64,
    pub review_count: u32,
    #[serde(flatten)]
    pub(crate) track: StageTrack<TerapistaStatus>,
    #[serde(default)]
    pub(crate) notes: Vec<Note>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTerapista {
    pub name: String,
    pub business_name: String,
    pub city: String,
    pub specialization: String,
    pub email: Option<String>,
    pub rating: f64,
    pub review_count: u32,
}

impl Terapista {
    pub fn create(fields: NewTerapista) -> Result<Self, BoardError> {
        require(&fields.name, "name")?;

        Ok(Self {
            id: EntityKind::Terapista.new_id(),
            name: fields.name,
            business_name: fields.business_name,
            city: fields.city,
            specialization: fields.specialization,
            email: fields.email,
            rating: fields.rating,
            review_count: fields.review_count,
            track: StageTrack::initial(),
            notes: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerapistaSortKey {
    Name,
    BusinessName,
    City,
    Specialization,
    Rating,
    ReviewCount,
    DaysInStatus,
    Status,
}

impl PipelineRecord for Terapista {
    type Stage = TerapistaStatus;
    type SortKey = TerapistaSortKey;

    const KIND: EntityKind = EntityKind::Terapista;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn track(&self) -> &StageTrack<TerapistaStatus> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut StageTrack<TerapistaStatus> {
        &mut self.track
    }

    fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.business_name.as_str(),
            self.city.as_str(),
        ]
    }

    fn sort_value(&self, key: TerapistaSortKey) -> SortValue {
        match key {
            TerapistaSortKey::Name => SortValue::text(&self.name),
            TerapistaSortKey::BusinessName => SortValue::text(&self.business_name),
            TerapistaSortKey::City => SortValue::text(&self.city),
            TerapistaSortKey::Specialization => SortValue::text(&self.specialization),
            TerapistaSortKey::Rating => SortValue::Number(self.rating),
            TerapistaSortKey::ReviewCount => SortValue::Number(self.review_count as f64),
            TerapistaSortKey::DaysInStatus => SortValue::Number(self.track.days_in_stage() as f64),
            TerapistaSortKey::Status => SortValue::Number(self.track.stage().ordinal() as f64),
        }
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::City => Some(self.city.as_str()),
            Facet::Specialization => Some(self.specialization.as_str()),
            Facet::Owner => None,
        }
    }

    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }

    fn review_count(&self) -> Option<u32> {
        Some(self.review_count)
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_pending() {
        let terapista = Terapista::create(NewTerapista {
            name: "Dott.ssa Marta Conti".to_string(),
            city: "Milano".to_string(),
            rating: 4.7,
            review_count: 88,
            ..Default::default()
        })
        .unwrap();

        assert!(terapista.id.starts_with("ter-"));
        assert_eq!(terapista.stage(), TerapistaStatus::Pending);
        assert_eq!(terapista.rating(), Some(4.7));
        assert_eq!(terapista.facet(Facet::Specialization), Some(""));
    }

    #[test]
    fn test_serialized_shape_uses_status() {
        let mut terapista = Terapista::create(NewTerapista {
            name: "Dott. Paolo Greco".to_string(),
            ..Default::default()
        })
        .unwrap();
        terapista.track.transition(TerapistaStatus::Active);
        terapista.track.advance(3);

        let json = serde_json::to_value(&terapista).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["daysInStatus"], 3);

        let back: Terapista = serde_json::from_value(json).unwrap();
        assert_eq!(back.stage(), TerapistaStatus::Active);
        assert_eq!(back.days_in_stage(), 3);
    }
}
