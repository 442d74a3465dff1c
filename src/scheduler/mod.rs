mod assignment;
mod types;

pub use types::{Plan, PlanOptions, SchedError};

use crate::ledger::Ledger;
use crate::model::Header;
use crate::roster::{RequestQueue, Roster};
use std::cmp::Ordering;
use tracing::{info, warn};

/// Scheduler : applique l'affectation gloutonne d'une période à la suivante
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    opts: PlanOptions,
}

impl Scheduler {
    pub fn new(opts: PlanOptions) -> Result<Self, SchedError> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn options(&self) -> &PlanOptions {
        &self.opts
    }

    /// Produit le planning et l'effectif de la période suivante.
    ///
    /// Les collections passées ne sont jamais modifiées.
    pub fn plan_next(&self, current: &Ledger, roster: &Roster, queue: &RequestQueue) -> Plan {
        if !headers_agree([current.header(), roster.header(), queue.header()]) {
            warn!("input snapshots do not describe the same period");
        }
        let plan = assignment::plan_next(current, roster, queue, &self.opts);
        info!(
            next_start = %plan.next_start,
            events = plan.ledger.len(),
            carried_over = plan.carried_over,
            on_leave = plan.placed_on_leave.len(),
            "period planned"
        );
        plan
    }
}

/// Vrai si tous les en-têtes portent la même date et la même heure.
pub fn headers_agree(headers: [&Header; 3]) -> bool {
    headers
        .windows(2)
        .all(|w| w[0].period_cmp(w[1]) == Ordering::Equal)
}
