//! Derived dashboard metrics (pure math, no mutation).
//!
//! Everything here is a reduction over the full, unfiltered collection so
//! summary cards reflect the whole dataset rather than the filtered slice.
//! Empty input always yields zeroes, never NaN or a panic.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entity::PipelineRecord;
use crate::patients::Patient;
use crate::prospects::Prospect;
use crate::setters::Setter;
use crate::stage::{PatientStage, PipelineStage};
use crate::terapisti::Terapista;
use crate::types::{BonusPolicy, Config};
use crate::util::{agent_matches, percent_of, round_half_up};

// ---------------------------------------------------------------------------
// Stage counts and funnel
// ---------------------------------------------------------------------------

/// Count per stage. Every stage is present, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageCounts<S: PipelineStage>(BTreeMap<S, usize>);

impl<S: PipelineStage> StageCounts<S> {
    fn zeroed() -> Self {
        Self(S::ALL.iter().map(|stage| (*stage, 0)).collect())
    }

    pub fn get(&self, stage: S) -> usize {
        self.0.get(&stage).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, usize)> + '_ {
        self.0.iter().map(|(stage, count)| (*stage, *count))
    }
}

pub fn stage_counts<'a, R, I>(records: I) -> StageCounts<R::Stage>
where
    R: PipelineRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut counts = StageCounts::zeroed();
    for record in records {
        *counts.0.entry(record.stage()).or_insert(0) += 1;
    }
    counts
}

/// Records at or beyond a stage, and their share of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStep<S> {
    pub stage: S,
    pub label: &'static str,
    pub reached: usize,
    pub percent: u32,
}

/// Build the funnel from stage counts: each step counts every record whose
/// stage ordinal is greater than or equal to the step's.
pub fn funnel_from_counts<S: PipelineStage>(counts: &StageCounts<S>) -> Vec<FunnelStep<S>> {
    let total = counts.total();
    let mut reached = total;
    let mut steps = Vec::with_capacity(S::ALL.len());

    for stage in S::ALL {
        steps.push(FunnelStep {
            stage: *stage,
            label: stage.label(),
            reached,
            percent: percent_of(reached, total),
        });
        reached -= counts.get(*stage);
    }

    steps
}

pub fn funnel<'a, R, I>(records: I) -> Vec<FunnelStep<R::Stage>>
where
    R: PipelineRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    funnel_from_counts(&stage_counts(records))
}

/// Share of records that reached or passed `stage`, in whole percent.
///
/// Zero for an empty collection.
pub fn conversion_rate<'a, R, I>(records: I, stage: R::Stage) -> u32
where
    R: PipelineRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut total = 0usize;
    let mut reached = 0usize;
    for record in records {
        total += 1;
        if record.stage() >= stage {
            reached += 1;
        }
    }
    percent_of(reached, total)
}

/// Arithmetic mean of `value` over `items`. Zero for empty input;
/// non-finite values are skipped.
pub fn average_of<'a, T, I, F>(items: I, value: F) -> f64
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> f64,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for item in items {
        let v = value(item);
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

// ---------------------------------------------------------------------------
// Bonus and workload
// ---------------------------------------------------------------------------

/// Bonus in whole euro for a setter's shows.
///
/// Example with the default policy: 13 shows at 81% → `13*3 + round(6.5)` = 46
pub fn bonus_earned(shows: u32, show_rate: u8, policy: &BonusPolicy) -> u32 {
    let base = shows.saturating_mul(policy.base_rate);
    if show_rate < policy.performance_threshold {
        return base;
    }
    let extra = round_half_up(shows as f64 * policy.performance_bonus_rate).max(0);
    base.saturating_add(u32::try_from(extra).unwrap_or(u32::MAX))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkloadLevel {
    Light,
    Moderate,
    Heavy,
}

impl WorkloadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadLevel::Light => "Light",
            WorkloadLevel::Moderate => "Moderate",
            WorkloadLevel::Heavy => "Heavy",
        }
    }
}

/// Bucket a setter's load: light below 60% of capacity, moderate below 80%,
/// heavy otherwise. With the default capacity of 25 that is <15 and <20.
pub fn workload_level(count: usize, capacity: u32) -> WorkloadLevel {
    let count = count as u64;
    let capacity = capacity as u64;
    if capacity == 0 {
        return if count == 0 {
            WorkloadLevel::Light
        } else {
            WorkloadLevel::Heavy
        };
    }
    if count * 5 < capacity * 3 {
        WorkloadLevel::Light
    } else if count * 5 < capacity * 4 {
        WorkloadLevel::Moderate
    } else {
        WorkloadLevel::Heavy
    }
}

/// Progress-bar fill: `min(count / capacity, 1) * 100`, rounded half-up.
pub fn workload_percent(count: usize, capacity: u32) -> u32 {
    if capacity == 0 {
        return if count == 0 { 0 } else { 100 };
    }
    percent_of(count, capacity as usize).min(100)
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Everything a pipeline's summary cards and funnel chart need.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary<S: PipelineStage> {
    pub total: usize,
    pub stage_counts: StageCounts<S>,
    pub funnel: Vec<FunnelStep<S>>,
    /// Share that reached the terminal stage.
    pub conversion_rate: u32,
    pub average_days_in_stage: f64,
    /// Non-terminal records idle longer than the stall threshold.
    pub stalled: usize,
}

pub fn summarize<R: PipelineRecord>(records: &[R], stall_after_days: u32) -> PipelineSummary<R::Stage> {
    let counts = stage_counts(records);
    let terminal = R::Stage::ALL[R::Stage::ALL.len() - 1];
    let stalled = records
        .iter()
        .filter(|r| !r.stage().is_terminal() && r.days_in_stage() > stall_after_days)
        .count();

    PipelineSummary {
        total: records.len(),
        funnel: funnel_from_counts(&counts),
        stage_counts: counts,
        conversion_rate: conversion_rate(records, terminal),
        average_days_in_stage: average_of(records, |r| r.days_in_stage() as f64),
        stalled,
    }
}

/// Per-setter performance card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterScorecard {
    pub setter_id: String,
    pub name: String,
    pub assigned_prospects: usize,
    pub workload: WorkloadLevel,
    pub workload_percent: u32,
    pub shows: u32,
    pub show_rate: u8,
    pub bonus_earned: u32,
}

/// Join setters with the prospects assigned to them (by id or name).
pub fn setter_scorecards(
    setters: &[Setter],
    prospects: &[Prospect],
    config: &Config,
) -> Vec<SetterScorecard> {
    setters
        .iter()
        .map(|setter| {
            let assigned = prospects
                .iter()
                .filter(|p| agent_matches(&p.assigned_setter, &setter.id, &setter.name))
                .count();
            SetterScorecard {
                setter_id: setter.id.clone(),
                name: setter.name.clone(),
                assigned_prospects: assigned,
                workload: workload_level(assigned, config.workload.capacity),
                workload_percent: workload_percent(assigned, config.workload.capacity),
                shows: setter.shows,
                show_rate: setter.show_rate,
                bonus_earned: bonus_earned(setter.shows, setter.show_rate, &config.bonus),
            }
        })
        .collect()
}

/// Per-terapista patient load and paid revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerapistaLoad {
    pub terapista_id: String,
    pub name: String,
    pub patients: usize,
    pub paid: usize,
    /// Sum of session values of paid patients, in euro.
    pub revenue: u32,
}

pub fn terapista_loads(terapisti: &[Terapista], patients: &[Patient]) -> Vec<TerapistaLoad> {
    terapisti
        .iter()
        .map(|terapista| {
            let mine: Vec<&Patient> = patients
                .iter()
                .filter(|p| agent_matches(&p.terapista, &terapista.id, &terapista.name))
                .collect();
            let paid: Vec<&&Patient> = mine
                .iter()
                .filter(|p| p.stage() == PatientStage::Paid)
                .collect();
            TerapistaLoad {
                terapista_id: terapista.id.clone(),
                name: terapista.name.clone(),
                patients: mine.len(),
                paid: paid.len(),
                revenue: paid
                    .iter()
                    .fold(0u32, |acc, p| acc.saturating_add(p.session_value)),
            }
        })
        .collect()
}
