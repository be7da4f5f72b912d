//! Setter records: the sales agents who book appointments with prospects.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::entity::{require, EntityKind, Facet, Note, PipelineRecord};
use crate::error::BoardError;
use crate::queries::sort::SortValue;
use crate::stage::{PipelineStage, SetterStatus, StageTrack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setter {
    pub id: String,
    pub name: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Appointments booked in the current period.
    pub appointments: u32,
    /// Booked appointments that actually took place.
    pub shows: u32,
    /// Shows over appointments, in percent, as reported by the CRM.
    pub show_rate: u8,
    #[serde(flatten)]
    pub(crate) track: StageTrack<SetterStatus>,
    #[serde(default)]
    pub(crate) notes: Vec<Note>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSetter {
    pub name: String,
    pub city: String,
    pub email: Option<String>,
    pub appointments: u32,
    pub shows: u32,
    pub show_rate: u8,
}

impl Setter {
    pub fn create(fields: NewSetter) -> Result<Self, BoardError> {
        require(&fields.name, "name")?;

        Ok(Self {
            id: EntityKind::Setter.new_id(),
            name: fields.name,
            city: fields.city,
            email: fields.email,
            appointments: fields.appointments,
            shows: fields.shows,
            show_rate: fields.show_rate,
            track: StageTrack::initial(),
            notes: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetterSortKey {
    Name,
    City,
    Appointments,
    Shows,
    ShowRate,
    DaysInStatus,
    Status,
}

impl PipelineRecord for Setter {
    type Stage = SetterStatus;
    type SortKey = SetterSortKey;

    const KIND: EntityKind = EntityKind::Setter;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn track(&self) -> &StageTrack<SetterStatus> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut StageTrack<SetterStatus> {
        &mut self.track
    }

    fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.city.as_str()]
    }

    fn sort_value(&self, key: SetterSortKey) -> SortValue {
        match key {
            SetterSortKey::Name => SortValue::text(&self.name),
            SetterSortKey::City => SortValue::text(&self.city),
            SetterSortKey::Appointments => SortValue::Number(self.appointments as f64),
            SetterSortKey::Shows => SortValue::Number(self.shows as f64),
            SetterSortKey::ShowRate => SortValue::Number(self.show_rate as f64),
            SetterSortKey::DaysInStatus => SortValue::Number(self.track.days_in_stage() as f64),
            SetterSortKey::Status => SortValue::Number(self.track.stage().ordinal() as f64),
        }
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::City => Some(self.city.as_str()),
            Facet::Owner | Facet::Specialization => None,
        }
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_onboarding() {
        let setter = Setter::create(NewSetter {
            name: "Giulia Rossi".to_string(),
            shows: 13,
            show_rate: 81,
            ..Default::default()
        })
        .unwrap();

        assert!(setter.id.starts_with("set-"));
        assert_eq!(setter.stage(), SetterStatus::Onboarding);
        assert_eq!(setter.shows, 13);
    }

    #[test]
    fn test_setter_cannot_be_reassigned() {
        let mut setter = Setter::create(NewSetter {
            name: "Luca Ferri".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(!setter.set_owner("someone"));
        assert_eq!(setter.owner(), None);
    }

    #[test]
    fn test_serialized_shape_uses_status() {
        let setter = Setter::create(NewSetter {
            name: "Chiara Ricci".to_string(),
            city: "Torino".to_string(),
            ..Default::default()
        })
        .unwrap();
        let json = serde_json::to_value(&setter).unwrap();
        assert_eq!(json["status"], "onboarding");
        assert_eq!(json["daysInStatus"], 0);
        assert!(json.get("stage").is_none());

        let back: Setter = serde_json::from_value(json).unwrap();
        assert_eq!(back, setter);
    }
}
