//! Pipeline stage enumerations and the transition surface.
//!
//! Every entity kind owns a closed, ordered list of stages. Variant order is
//! pipeline order (`Ord` is derived), the first variant is where new records
//! start and the last one is terminal. Transitions are any-to-any: the board
//! lets a card be dropped on any column, so there is no transition table.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Behaviour shared by every stage/status enumeration.
pub trait PipelineStage:
    Copy + Eq + Ord + Hash + fmt::Debug + Serialize + DeserializeOwned + 'static
{
    /// All stages in pipeline order. Never empty.
    const ALL: &'static [Self];

    /// JSON names of a record's stage and day-counter fields.
    const TRACK_FIELDS: (&'static str, &'static str) = ("stage", "daysInStage");

    /// Kebab-case wire name, e.g. `appointment-set`.
    fn as_str(&self) -> &'static str;

    /// Human label for column headers.
    fn label(&self) -> &'static str;

    /// Parse a wire name. Case and surrounding whitespace are ignored.
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(value))
    }

    /// Stage assigned to freshly created records.
    fn first() -> Self {
        Self::ALL[0]
    }

    /// Zero-based position in the pipeline.
    fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|stage| stage == self)
            .unwrap_or_default()
    }

    fn is_terminal(&self) -> bool {
        self.ordinal() + 1 == Self::ALL.len()
    }
}

// =============================================================================
// Prospect pipeline
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProspectStage {
    NewLeads,
    Contacted,
    AppointmentSet,
    Show,
    Converted,
}

impl PipelineStage for ProspectStage {
    const ALL: &'static [Self] = &[
        Self::NewLeads,
        Self::Contacted,
        Self::AppointmentSet,
        Self::Show,
        Self::Converted,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::NewLeads => "new-leads",
            Self::Contacted => "contacted",
            Self::AppointmentSet => "appointment-set",
            Self::Show => "show",
            Self::Converted => "converted",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NewLeads => "New Leads",
            Self::Contacted => "Contacted",
            Self::AppointmentSet => "Appointment Set",
            Self::Show => "Show",
            Self::Converted => "Converted",
        }
    }
}

// =============================================================================
// Patient pipeline
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientStage {
    NewLeads,
    Nurturing,
    Called,
    Appointment,
    Completed,
    Paid,
}

impl PipelineStage for PatientStage {
    const ALL: &'static [Self] = &[
        Self::NewLeads,
        Self::Nurturing,
        Self::Called,
        Self::Appointment,
        Self::Completed,
        Self::Paid,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::NewLeads => "new-leads",
            Self::Nurturing => "nurturing",
            Self::Called => "called",
            Self::Appointment => "appointment",
            Self::Completed => "completed",
            Self::Paid => "paid",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NewLeads => "New Leads",
            Self::Nurturing => "Nurturing",
            Self::Called => "Called",
            Self::Appointment => "Appointment",
            Self::Completed => "Completed",
            Self::Paid => "Paid",
        }
    }
}

// =============================================================================
// Setter / Terapista statuses
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetterStatus {
    Onboarding,
    Active,
    Paused,
    Inactive,
}

impl PipelineStage for SetterStatus {
    const ALL: &'static [Self] = &[Self::Onboarding, Self::Active, Self::Paused, Self::Inactive];
    const TRACK_FIELDS: (&'static str, &'static str) = ("status", "daysInStatus");

    fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Onboarding => "Onboarding",
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerapistaStatus {
    Pending,
    Active,
    Suspended,
}

impl PipelineStage for TerapistaStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Active, Self::Suspended];
    const TRACK_FIELDS: (&'static str, &'static str) = ("status", "daysInStatus");

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }
}

// =============================================================================
// Stage tracking
// =============================================================================

/// Current stage plus the number of days spent in it.
///
/// Fields are crate-private so the only way to change the stage is
/// [`StageTrack::transition`], which keeps the day counter honest. On the
/// wire the field names come from [`PipelineStage::TRACK_FIELDS`], so
/// setters and terapisti carry `status`/`daysInStatus`.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTrack<S> {
    pub(crate) stage: S,
    pub(crate) days_in_stage: u32,
}

impl<S: PipelineStage> StageTrack<S> {
    /// Track starting at the first stage with a zeroed counter.
    pub fn initial() -> Self {
        Self {
            stage: S::first(),
            days_in_stage: 0,
        }
    }

    /// Track at an arbitrary stage, used for seeded data.
    pub fn at(stage: S, days_in_stage: u32) -> Self {
        Self {
            stage,
            days_in_stage,
        }
    }

    pub fn stage(&self) -> S {
        self.stage
    }

    pub fn days_in_stage(&self) -> u32 {
        self.days_in_stage
    }

    /// Move to `target`. Returns the previous stage when the stage actually
    /// changed; a same-stage move leaves the counter untouched.
    pub(crate) fn transition(&mut self, target: S) -> Option<S> {
        if self.stage == target {
            return None;
        }
        let previous = self.stage;
        self.stage = target;
        self.days_in_stage = 0;
        Some(previous)
    }

    pub(crate) fn advance(&mut self, days: u32) {
        self.days_in_stage = self.days_in_stage.saturating_add(days);
    }
}

impl<S: PipelineStage> Serialize for StageTrack<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        let (stage_field, days_field) = S::TRACK_FIELDS;
        let mut track = serializer.serialize_struct("StageTrack", 2)?;
        track.serialize_field(stage_field, &self.stage)?;
        track.serialize_field(days_field, &self.days_in_stage)?;
        track.end()
    }
}

impl<'de, S: PipelineStage> Deserialize<'de> for StageTrack<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TrackVisitor(PhantomData))
    }
}

struct TrackVisitor<S>(PhantomData<S>);

impl<'de, S: PipelineStage> Visitor<'de> for TrackVisitor<S> {
    type Value = StageTrack<S>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (stage_field, days_field) = S::TRACK_FIELDS;
        write!(f, "a map with `{}` and `{}`", stage_field, days_field)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let (stage_field, days_field) = S::TRACK_FIELDS;
        let mut stage = None;
        let mut days_in_stage = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == stage_field {
                stage = Some(map.next_value::<S>()?);
            } else if key == days_field {
                days_in_stage = Some(map.next_value::<u32>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(StageTrack {
            stage: stage.ok_or_else(|| <A::Error as de::Error>::missing_field(stage_field))?,
            days_in_stage: days_in_stage.unwrap_or(0),
        })
    }
}

/// Result of a single stage move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MoveOutcome<S> {
    Moved { from: S, to: S },
    Unchanged,
    NotFound,
    UnknownStage,
}

impl<S> MoveOutcome<S> {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}
