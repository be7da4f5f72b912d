//! Sales and clinical pipeline boards for a therapy-practice network.
//!
//! Four record kinds (prospects, patients, setters, terapisti) each live on
//! a [`board::Board`] that owns its [`store::Store`], keeps a bulk
//! [`selection::Selection`] and recomputes a [`metrics::PipelineSummary`]
//! after every mutation.

pub mod board;
pub mod devtools;
pub mod entity;
pub mod error;
pub mod metrics;
pub mod patients;
pub mod prospects;
pub mod queries;
pub mod selection;
pub mod setters;
pub mod stage;
pub mod state;
pub mod store;
pub mod terapisti;
pub mod types;
pub mod util;

pub use board::Board;
pub use error::{BoardError, ErrorPayload};
pub use state::{AppState, DashboardSnapshot};
pub use types::Config;

/// Load config, seed the mock dataset and return the dashboard snapshot.
pub fn run() -> Result<DashboardSnapshot, BoardError> {
    let config = state::load_config()?;
    let mut app = AppState::new(config);
    let message = devtools::apply_scenario("mock_full", &mut app)?;
    log::info!("{}", message);
    Ok(app.snapshot())
}
