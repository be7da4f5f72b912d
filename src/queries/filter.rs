use serde::{Deserialize, Serialize};

use crate::entity::{Facet, PipelineRecord};
use crate::stage::PipelineStage;
use crate::util::{contains_lowercase, is_unconstrained};

/// Rating ranges offered by the rating filter control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingBucket {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "4+")]
    FourPlus,
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[serde(rename = "below-3")]
    BelowThree,
}

impl RatingBucket {
    /// Parse a control value. Anything unrecognized means no constraint.
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim() {
            "4+" => RatingBucket::FourPlus,
            "3-4" => RatingBucket::ThreeToFour,
            "below-3" => RatingBucket::BelowThree,
            other => {
                if !is_unconstrained(other) {
                    log::debug!("Unrecognized rating bucket '{}', ignoring", other);
                }
                RatingBucket::All
            }
        }
    }

    /// `4+` is `>= 4.0`, `3-4` is `[3.0, 4.0)`, `below-3` is `< 3.0`.
    pub fn contains(&self, rating: f64) -> bool {
        match self {
            RatingBucket::All => true,
            RatingBucket::FourPlus => rating >= 4.0,
            RatingBucket::ThreeToFour => (3.0..4.0).contains(&rating),
            RatingBucket::BelowThree => rating < 3.0,
        }
    }
}

/// Review-count ranges offered by the reviews filter control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewCountBucket {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "50+")]
    FiftyPlus,
    #[serde(rename = "20-50")]
    TwentyToFifty,
    #[serde(rename = "below-20")]
    BelowTwenty,
}

impl ReviewCountBucket {
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim() {
            "50+" => ReviewCountBucket::FiftyPlus,
            "20-50" => ReviewCountBucket::TwentyToFifty,
            "below-20" => ReviewCountBucket::BelowTwenty,
            other => {
                if !is_unconstrained(other) {
                    log::debug!("Unrecognized review bucket '{}', ignoring", other);
                }
                ReviewCountBucket::All
            }
        }
    }

    /// `50+` is `>= 50`, `20-50` is `[20, 50)`, `below-20` is `< 20`.
    pub fn contains(&self, count: u32) -> bool {
        match self {
            ReviewCountBucket::All => true,
            ReviewCountBucket::FiftyPlus => count >= 50,
            ReviewCountBucket::TwentyToFifty => (20..50).contains(&count),
            ReviewCountBucket::BelowTwenty => count < 20,
        }
    }
}

/// Filter control values as the presentation layer sends them.
///
/// Every field defaults to "no constraint".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCriteria {
    pub search_text: String,
    pub status_filter: String,
    pub city_filter: String,
    pub setter_filter: String,
    pub specialization_filter: String,
    pub rating_bucket: String,
    pub review_count_bucket: String,
}

/// Typed filter criteria. `None` facets and `All` buckets do not constrain.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria<S> {
    pub search_text: String,
    pub status: Option<S>,
    pub city: Option<String>,
    pub setter: Option<String>,
    pub specialization: Option<String>,
    pub rating: RatingBucket,
    pub review_count: ReviewCountBucket,
}

impl<S> Default for FilterCriteria<S> {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status: None,
            city: None,
            setter: None,
            specialization: None,
            rating: RatingBucket::All,
            review_count: ReviewCountBucket::All,
        }
    }
}

fn facet_value(value: &str) -> Option<String> {
    if is_unconstrained(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

impl<S: PipelineStage> FilterCriteria<S> {
    /// Build criteria from control values. Unknown statuses and buckets
    /// degrade to no constraint instead of failing.
    pub fn from_raw(raw: &RawCriteria) -> Self {
        let status = if is_unconstrained(&raw.status_filter) {
            None
        } else {
            let parsed = S::parse(&raw.status_filter);
            if parsed.is_none() {
                log::debug!("Unrecognized status filter '{}', ignoring", raw.status_filter);
            }
            parsed
        };

        Self {
            search_text: raw.search_text.clone(),
            status,
            city: facet_value(&raw.city_filter),
            setter: facet_value(&raw.setter_filter),
            specialization: facet_value(&raw.specialization_filter),
            rating: RatingBucket::from_str_lossy(&raw.rating_bucket),
            review_count: ReviewCountBucket::from_str_lossy(&raw.review_count_bucket),
        }
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search_text = text.to_string();
        self
    }

    pub fn status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.city = facet_value(city);
        self
    }

    pub fn setter(mut self, setter: &str) -> Self {
        self.setter = facet_value(setter);
        self
    }

    pub fn specialization(mut self, specialization: &str) -> Self {
        self.specialization = facet_value(specialization);
        self
    }

    pub fn rating(mut self, bucket: RatingBucket) -> Self {
        self.rating = bucket;
        self
    }

    pub fn review_count(mut self, bucket: ReviewCountBucket) -> Self {
        self.review_count = bucket;
        self
    }

    /// True when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.status.is_none()
            && self.city.is_none()
            && self.setter.is_none()
            && self.specialization.is_none()
            && self.rating == RatingBucket::All
            && self.review_count == ReviewCountBucket::All
    }

    /// All active constraints must hold. A record lacking a constrained
    /// attribute never matches.
    pub fn matches<R: PipelineRecord<Stage = S>>(&self, record: &R) -> bool {
        let needle = self.search_text.to_lowercase();
        if !needle.trim().is_empty()
            && !record
                .searchable_fields()
                .iter()
                .any(|field| contains_lowercase(field, &needle))
        {
            return false;
        }

        if let Some(status) = self.status {
            if record.stage() != status {
                return false;
            }
        }

        let facets = [
            (Facet::City, &self.city),
            (Facet::Owner, &self.setter),
            (Facet::Specialization, &self.specialization),
        ];
        for (facet, wanted) in facets {
            if let Some(wanted) = wanted {
                if record.facet(facet) != Some(wanted.as_str()) {
                    return false;
                }
            }
        }

        if self.rating != RatingBucket::All {
            match record.rating() {
                Some(rating) if self.rating.contains(rating) => {}
                _ => return false,
            }
        }

        if self.review_count != ReviewCountBucket::All {
            match record.review_count() {
                Some(count) if self.review_count.contains(count) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Derive a read-only view of the records that match `criteria`, in input
/// order. The input is never modified.
pub fn apply_filters<'a, R, I>(records: I, criteria: &FilterCriteria<R::Stage>) -> Vec<&'a R>
where
    R: PipelineRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    if criteria.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| criteria.matches(*record))
        .collect()
}
