use serde::{Deserialize, Serialize};

/// Configuration stored in ~/.salesboard/config.json
///
/// Every field is optional in the file; missing values fall back to the
/// dashboard's built-in rates and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub bonus: BonusPolicy,
    #[serde(default)]
    pub workload: WorkloadPolicy,
    /// Records idle longer than this many days count as stalled.
    #[serde(default = "default_stall_after_days")]
    pub stall_after_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bonus: BonusPolicy::default(),
            workload: WorkloadPolicy::default(),
            stall_after_days: default_stall_after_days(),
        }
    }
}

fn default_stall_after_days() -> u32 {
    14
}

// =============================================================================
// Setter bonus
// =============================================================================

/// How setter bonuses are paid.
///
/// `shows * base_rate`, plus `round_half_up(shows * performance_bonus_rate)`
/// when the setter's show rate reaches `performance_threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusPolicy {
    /// Euro paid per show.
    #[serde(default = "default_base_rate")]
    pub base_rate: u32,
    /// Extra euro per show once the threshold is met.
    #[serde(default = "default_performance_bonus_rate")]
    pub performance_bonus_rate: f64,
    /// Show rate (percent) that unlocks the performance bonus.
    #[serde(default = "default_performance_threshold")]
    pub performance_threshold: u8,
}

impl Default for BonusPolicy {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            performance_bonus_rate: default_performance_bonus_rate(),
            performance_threshold: default_performance_threshold(),
        }
    }
}

fn default_base_rate() -> u32 {
    3
}

fn default_performance_bonus_rate() -> f64 {
    0.5
}

fn default_performance_threshold() -> u8 {
    80
}

// =============================================================================
// Setter workload
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadPolicy {
    /// Prospects a setter can carry at 100%.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> u32 {
    25
}
