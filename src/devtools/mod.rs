//! Dev tools for scenario switching and mock data.
//!
//! Mock records are deterministic apart from their generated ids, so a
//! scenario always produces the same counts, funnels and scorecards.

use crate::entity::PipelineRecord;
use crate::error::BoardError;
use crate::patients::{NewPatient, Patient};
use crate::prospects::{NewProspect, Prospect};
use crate::setters::{NewSetter, Setter};
use crate::stage::{
    PatientStage, PipelineStage, ProspectStage, SetterStatus, StageTrack, TerapistaStatus,
};
use crate::state::AppState;
use crate::store::Store;
use crate::terapisti::{NewTerapista, Terapista};

pub const CITIES: [&str; 5] = ["Milano", "Roma", "Torino", "Bologna", "Napoli"];

const SPECIALIZATIONS: [&str; 4] = ["Psicologia", "Fisioterapia", "Nutrizione", "Osteopatia"];

const SURNAMES: [&str; 12] = [
    "Rossi", "Bianchi", "Romano", "Colombo", "Ricci", "Marino", "Greco", "Bruno", "Gallo",
    "Conti", "De Luca", "Costa",
];

const FIRST_NAMES: [&str; 8] = [
    "Giulia", "Marco", "Francesca", "Luca", "Chiara", "Andrea", "Sara", "Matteo",
];

/// Days since the fixture's last stage change, cycled over records so the
/// mock board shows fresh, aging and stalled cards.
const DAY_PATTERN: [u32; 6] = [0, 2, 5, 9, 16, 23];

/// Apply a named scenario. Returns a short description of what was loaded.
pub fn apply_scenario(scenario: &str, state: &mut AppState) -> Result<String, BoardError> {
    match scenario {
        "reset" => {
            *state = AppState::new(state.config.clone());
            Ok("Reset to empty boards".into())
        }
        "mock_full" => {
            install_mock_data(state)?;
            Ok(format!(
                "Loaded {} prospects, {} patients, {} setters, {} terapisti",
                state.prospects.store().len(),
                state.patients.store().len(),
                state.setters.store().len(),
                state.terapisti.store().len()
            ))
        }
        "mock_stalled" => {
            install_mock_data(state)?;
            state.advance_days(21);
            Ok(format!(
                "Loaded mock data aged 21 days ({} stalled prospects)",
                state.prospects.summary().stalled
            ))
        }
        _ => Err(BoardError::UnknownScenario(scenario.to_string())),
    }
}

/// Replace every board with the mock dataset.
pub fn install_mock_data(state: &mut AppState) -> Result<(), BoardError> {
    let setters = mock_setters()?;
    let terapisti = mock_terapisti()?;
    let prospects = mock_prospects(&setters)?;
    let patients = mock_patients(&terapisti)?;

    *state = AppState::with_stores(
        state.config.clone(),
        Store::from_records(prospects)?,
        Store::from_records(patients)?,
        Store::from_records(setters)?,
        Store::from_records(terapisti)?,
    );
    log::info!("Installed mock data");
    Ok(())
}

fn person(i: usize) -> String {
    format!(
        "{} {}",
        FIRST_NAMES[i % FIRST_NAMES.len()],
        SURNAMES[(i * 5 + 3) % SURNAMES.len()]
    )
}

fn email_for(name: &str) -> String {
    format!("{}@example.it", name.to_lowercase().replace(' ', "."))
}

pub fn mock_setters() -> Result<Vec<Setter>, BoardError> {
    let fixtures: [(&str, u32, u32, SetterStatus); 5] = [
        ("Giulia Rossi", 16, 13, SetterStatus::Active),
        ("Marco Bianchi", 22, 15, SetterStatus::Active),
        ("Chiara Ricci", 9, 8, SetterStatus::Active),
        ("Luca Conti", 4, 2, SetterStatus::Onboarding),
        ("Sara Greco", 12, 7, SetterStatus::Paused),
    ];

    fixtures
        .iter()
        .enumerate()
        .map(|(i, (name, appointments, shows, status))| -> Result<Setter, BoardError> {
            let show_rate = crate::util::percent_of(*shows as usize, *appointments as usize);
            let mut setter = Setter::create(NewSetter {
                name: name.to_string(),
                city: CITIES[i % CITIES.len()].to_string(),
                email: Some(email_for(name)),
                appointments: *appointments,
                shows: *shows,
                show_rate: show_rate.min(100) as u8,
            })?;
            setter.track = StageTrack::at(*status, DAY_PATTERN[i % DAY_PATTERN.len()]);
            Ok(setter)
        })
        .collect()
}

pub fn mock_terapisti() -> Result<Vec<Terapista>, BoardError> {
    (0..8)
        .map(|i: usize| -> Result<Terapista, BoardError> {
            let name = format!("Dott. {}", person(i + 3));
            let status = match i % 4 {
                0 => TerapistaStatus::Pending,
                3 => TerapistaStatus::Suspended,
                _ => TerapistaStatus::Active,
            };
            let mut terapista = Terapista::create(NewTerapista {
                email: Some(email_for(&person(i + 3))),
                business_name: format!("Studio {}", SURNAMES[i % SURNAMES.len()]),
                city: CITIES[i % CITIES.len()].to_string(),
                specialization: SPECIALIZATIONS[i % SPECIALIZATIONS.len()].to_string(),
                rating: 3.4 + (i % 4) as f64 * 0.45,
                review_count: 8 + (i as u32 * 11) % 70,
                name,
            })?;
            terapista.track = StageTrack::at(status, DAY_PATTERN[(i + 1) % DAY_PATTERN.len()]);
            Ok(terapista)
        })
        .collect()
}

pub fn mock_prospects(setters: &[Setter]) -> Result<Vec<Prospect>, BoardError> {
    (0..30)
        .map(|i: usize| -> Result<Prospect, BoardError> {
            let surname = SURNAMES[i % SURNAMES.len()];
            let stage = ProspectStage::ALL[(i * 7) % ProspectStage::ALL.len()];
            let owner = setters
                .get(i % setters.len().max(1))
                .map(|s| s.name.clone())
                .unwrap_or_default();
            let mut prospect = Prospect::create(NewProspect {
                name: format!("Dott. {}", person(i)),
                business_name: format!("Studio {} {}", surname, i + 1),
                city: CITIES[(i * 3) % CITIES.len()].to_string(),
                specialization: SPECIALIZATIONS[i % SPECIALIZATIONS.len()].to_string(),
                phone: Some(format!("+39 3{:02} {:03} {:04}", 20 + i, 100 + i * 7, 1000 + i * 37)),
                email: (i % 3 != 0).then(|| email_for(&person(i))),
                rating: 2.6 + ((i * 13) % 24) as f64 / 10.0,
                review_count: ((i * 17) % 90) as u32,
                assigned_setter: owner,
                conversion_probability: ((i * 23) % 100) as u8,
            })?;
            prospect.track = StageTrack::at(stage, DAY_PATTERN[i % DAY_PATTERN.len()]);
            if i % 4 == 0 {
                prospect.add_note("Richiamare la prossima settimana");
            }
            Ok(prospect)
        })
        .collect()
}

pub fn mock_patients(terapisti: &[Terapista]) -> Result<Vec<Patient>, BoardError> {
    (0..24)
        .map(|i: usize| -> Result<Patient, BoardError> {
            let stage = PatientStage::ALL[(i * 5) % PatientStage::ALL.len()];
            let terapista = terapisti
                .get(i % terapisti.len().max(1))
                .map(|t| t.name.clone())
                .unwrap_or_default();
            let name = person(i + 7);
            let mut patient = Patient::create(NewPatient {
                email: Some(email_for(&name)),
                city: CITIES[(i * 2) % CITIES.len()].to_string(),
                terapista,
                session_value: 50 + (i as u32 % 4) * 15,
                name,
            })?;
            patient.track = StageTrack::at(stage, DAY_PATTERN[(i + 2) % DAY_PATTERN.len()]);
            Ok(patient)
        })
        .collect()
}
