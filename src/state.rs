use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::board::Board;
use crate::error::BoardError;
use crate::metrics::{setter_scorecards, terapista_loads, PipelineSummary, SetterScorecard, TerapistaLoad};
use crate::patients::Patient;
use crate::prospects::Prospect;
use crate::setters::Setter;
use crate::stage::{PatientStage, ProspectStage, SetterStatus, TerapistaStatus};
use crate::store::Store;
use crate::terapisti::Terapista;
use crate::types::Config;

/// Application state: the loaded config and one board per entity kind.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub prospects: Board<Prospect>,
    pub patients: Board<Patient>,
    pub setters: Board<Setter>,
    pub terapisti: Board<Terapista>,
}

impl AppState {
    /// Empty boards under the given config.
    pub fn new(config: Config) -> Self {
        Self::with_stores(
            config,
            Store::new(),
            Store::new(),
            Store::new(),
            Store::new(),
        )
    }

    pub fn with_stores(
        config: Config,
        prospects: Store<Prospect>,
        patients: Store<Patient>,
        setters: Store<Setter>,
        terapisti: Store<Terapista>,
    ) -> Self {
        let stall = config.stall_after_days;
        Self {
            prospects: Board::new(prospects, stall),
            patients: Board::new(patients, stall),
            setters: Board::new(setters, stall),
            terapisti: Board::new(terapisti, stall),
            config,
        }
    }

    /// Advance every board by the same number of days.
    pub fn advance_days(&mut self, days: u32) {
        self.prospects.advance_days(days);
        self.patients.advance_days(days);
        self.setters.advance_days(days);
        self.terapisti.advance_days(days);
    }

    /// Everything the dashboard's cards and charts render, in one value.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            prospects: self.prospects.summary().clone(),
            patients: self.patients.summary().clone(),
            setters: self.setters.summary().clone(),
            terapisti: self.terapisti.summary().clone(),
            setter_scorecards: setter_scorecards(
                self.setters.store().records(),
                self.prospects.store().records(),
                &self.config,
            ),
            terapista_loads: terapista_loads(
                self.terapisti.store().records(),
                self.patients.store().records(),
            ),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub prospects: PipelineSummary<ProspectStage>,
    pub patients: PipelineSummary<PatientStage>,
    pub setters: PipelineSummary<SetterStatus>,
    pub terapisti: PipelineSummary<TerapistaStatus>,
    pub setter_scorecards: Vec<SetterScorecard>,
    pub terapista_loads: Vec<TerapistaLoad>,
}

/// Get the canonical config file path (~/.salesboard/config.json)
pub fn config_path() -> Result<PathBuf, BoardError> {
    let home = dirs::home_dir().ok_or(BoardError::HomeDirNotFound)?;
    Ok(home.join(".salesboard").join("config.json"))
}

/// Load configuration from ~/.salesboard/config.json
pub fn load_config() -> Result<Config, BoardError> {
    load_config_from(&config_path()?)
}

/// Load configuration from `path`.
///
/// A missing file yields the built-in defaults. A file that exists but
/// cannot be read or parsed is an error.
pub fn load_config_from(path: &Path) -> Result<Config, BoardError> {
    if !path.exists() {
        log::warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| BoardError::ConfigRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config: Config = serde_json::from_str(&content)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}
