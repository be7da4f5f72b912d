//! Prospect records: therapists being recruited onto the platform.
//!
//! A prospect is worked by a setter through the sales pipeline
//! (`new-leads → contacted → appointment-set → show → converted`).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::entity::{require, EntityKind, Facet, Note, PipelineRecord};
use crate::error::BoardError;
use crate::queries::sort::SortValue;
use crate::stage::{PipelineStage, ProspectStage, StageTrack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub id: String,
    pub name: String,
    pub business_name: String,
    pub city: String,
    pub specialization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub rating: f64,
    pub review_count: u32,
    pub assigned_setter: String,
    /// Estimated likelihood of converting, in percent.
    pub conversion_probability: u8,
    #[serde(flatten)]
    pub(crate) track: StageTrack<ProspectStage>,
    #[serde(default)]
    pub(crate) notes: Vec<Note>,
    pub created_at: String,
}

/// Caller-supplied fields for a new prospect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProspect {
    pub name: String,
    pub business_name: String,
    pub city: String,
    pub specialization: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub rating: f64,
    pub review_count: u32,
    pub assigned_setter: String,
    pub conversion_probability: u8,
}

impl Prospect {
    /// Create a prospect in the first pipeline stage.
    ///
    /// Only `name` and `city` are required. Metric fields are taken as-is,
    /// including out-of-range values.
    pub fn create(fields: NewProspect) -> Result<Self, BoardError> {
        require(&fields.name, "name")?;
        require(&fields.city, "city")?;

        Ok(Self {
            id: EntityKind::Prospect.new_id(),
            name: fields.name,
            business_name: fields.business_name,
            city: fields.city,
            specialization: fields.specialization,
            phone: fields.phone,
            email: fields.email,
            rating: fields.rating,
            review_count: fields.review_count,
            assigned_setter: fields.assigned_setter,
            conversion_probability: fields.conversion_probability,
            track: StageTrack::initial(),
            notes: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProspectSortKey {
    Name,
    BusinessName,
    City,
    Specialization,
    Rating,
    ReviewCount,
    ConversionProbability,
    DaysInStage,
    Stage,
}

impl PipelineRecord for Prospect {
    type Stage = ProspectStage;
    type SortKey = ProspectSortKey;

    const KIND: EntityKind = EntityKind::Prospect;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn track(&self) -> &StageTrack<ProspectStage> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut StageTrack<ProspectStage> {
        &mut self.track
    }

    fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.business_name.as_str(), self.city.as_str()]
    }

    fn sort_value(&self, key: ProspectSortKey) -> SortValue {
        match key {
            ProspectSortKey::Name => SortValue::text(&self.name),
            ProspectSortKey::BusinessName => SortValue::text(&self.business_name),
            ProspectSortKey::City => SortValue::text(&self.city),
            ProspectSortKey::Specialization => SortValue::text(&self.specialization),
            ProspectSortKey::Rating => SortValue::Number(self.rating),
            ProspectSortKey::ReviewCount => SortValue::Number(self.review_count as f64),
            ProspectSortKey::ConversionProbability => {
                SortValue::Number(self.conversion_probability as f64)
            }
            ProspectSortKey::DaysInStage => SortValue::Number(self.track.days_in_stage() as f64),
            ProspectSortKey::Stage => SortValue::Number(self.track.stage().ordinal() as f64),
        }
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::City => Some(self.city.as_str()),
            Facet::Owner => Some(self.assigned_setter.as_str()),
            Facet::Specialization => Some(self.specialization.as_str()),
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

    fn owner(&self) -> Option<&str> {
        Some(self.assigned_setter.as_str())
    }

    fn set_owner(&mut self, owner: &str) -> bool {
        self.assigned_setter = owner.to_string();
        true
    }
}
