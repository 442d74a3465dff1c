#![forbid(unsafe_code)]
//! Triage-rota : affectation du personnel soignant aux demandes en attente.
//!
//! - Une exécution = une transition de période (30 min par défaut).
//! - Entrées/sorties : instantanés texte (effectif, planning, demandes).
//! - Affectation gloutonne et déterministe par priorité, sans optimisation globale.

pub mod io;
pub mod ledger;
pub mod model;
pub mod report;
pub mod roster;
pub mod scheduler;
pub mod storage;
pub mod time;

pub use ledger::{Ledger, ServiceEvent};
pub use model::{Availability, Band, Header, Named, Party, Requester, Scope, Staff, Urgency};
pub use report::{JsonReport, ReportRenderer, RunReport, TextReport};
pub use roster::{RequestQueue, Roster};
pub use scheduler::{Plan, PlanOptions, SchedError, Scheduler};
pub use storage::{DirectorySink, SnapshotSink};
pub use time::{Duration, FormatError, OperatingHours};
