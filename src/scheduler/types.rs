use crate::ledger::Ledger;
use crate::model::Scope;
use crate::roster::Roster;
use crate::time::{Duration, FormatError, OperatingHours};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options de planification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanOptions {
    /// Durée d'une intervention.
    pub encounter: Duration,
    /// Pas entre deux exécutions.
    pub period: Duration,
    pub daily_break: Duration,
    /// Début de la bande de déclenchement de la pause (minutes du jour).
    pub break_after_minutes: u32,
    pub break_band_minutes: u32,
    pub max_weekly: Duration,
    pub hours: OperatingHours,
    /// Catégorie minimale pour une demande d'urgence haute.
    pub min_category: u8,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            encounter: Duration::hm(0, 20),
            period: Duration::hm(0, 30),
            daily_break: Duration::hm(1, 0),
            break_after_minutes: 240,
            break_band_minutes: 20,
            max_weekly: Duration::hm(40, 0),
            hours: OperatingHours::default(),
            min_category: 2,
        }
    }
}

impl PlanOptions {
    pub fn validate(&self) -> Result<(), SchedError> {
        if !self.encounter.is_positive() {
            return Err(SchedError::InvalidOptions("encounter must be > 0"));
        }
        if !self.period.is_positive() {
            return Err(SchedError::InvalidOptions("period must be > 0"));
        }
        if self.hours.opening >= self.hours.closing {
            return Err(SchedError::InvalidOptions("opening must be before closing"));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("scope mismatch in {file}: expected `{expected}`, header says `{found}`")]
    ScopeMismatch {
        file: String,
        expected: Scope,
        found: Scope,
    },
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Résultat d'une transition de période.
#[derive(Debug, Clone)]
pub struct Plan {
    pub ledger: Ledger,
    pub roster: Roster,
    pub next_start: Duration,
    pub assigned: usize,
    pub redirected: usize,
    pub carried_over: usize,
    pub placed_on_leave: Vec<String>,
}

impl Plan {
    /// Fin de journée : l'en-tête d'un des deux instantanés sort de la plage d'ouverture.
    pub fn is_end_of_day(&self, opts: &PlanOptions) -> bool {
        !opts.hours.contains(self.ledger.header().time) || !opts.hours.contains(self.roster.header().time)
    }
}
