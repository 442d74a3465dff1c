use crate::model::{Header, Party, Requester, Staff, REDIRECTED};
use crate::time::Duration;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Intervention planifiée (ou réorientée quand `staff` est absent). Immuable.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEvent {
    time: Duration,
    requester: Party<Requester>,
    staff: Option<Party<Staff>>,
}

impl ServiceEvent {
    pub fn assigned(time: Duration, requester: Party<Requester>, staff: Party<Staff>) -> Self {
        Self {
            time,
            requester,
            staff: Some(staff),
        }
    }

    pub fn redirected(time: Duration, requester: Party<Requester>) -> Self {
        Self {
            time,
            requester,
            staff: None,
        }
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn requester(&self) -> &Party<Requester> {
        &self.requester
    }

    pub fn staff(&self) -> Option<&Party<Staff>> {
        self.staff.as_ref()
    }

    pub fn is_redirected(&self) -> bool {
        self.staff.is_none()
    }

    /// Heure croissante puis nom du demandeur.
    pub fn chrono_cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.requester.name().cmp(other.requester.name()))
    }
}

/// Une intervention réorientée n'est égale à aucune autre.
impl PartialEq for ServiceEvent {
    fn eq(&self, other: &Self) -> bool {
        match (&self.staff, &other.staff) {
            (Some(a), Some(b)) => self.time == other.time && self.requester == other.requester && a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let staff = self.staff.as_ref().map_or(REDIRECTED, |s| s.name());
        write!(f, "{}, {}, {}", self.time, self.requester.name(), staff)
    }
}

/// Planning d'une période : interventions ordonnées + en-tête.
#[derive(Debug, Clone)]
pub struct Ledger {
    header: Header,
    events: Vec<ServiceEvent>,
}

impl Ledger {
    pub fn new(header: Header, events: Vec<ServiceEvent>) -> Self {
        Self { header, events }
    }

    pub fn empty(header: Header) -> Self {
        Self::new(header, Vec::new())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn events(&self) -> &[ServiceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: ServiceEvent) {
        self.events.push(event);
    }

    pub fn contains_requester(&self, name: &str) -> bool {
        self.events.iter().any(|e| e.requester.name() == name)
    }

    /// Interventions pas encore réalisées à `from` (heure >= `from`).
    pub fn pending_from(&self, from: Duration) -> impl Iterator<Item = &ServiceEvent> + '_ {
        self.events.iter().filter(move |e| e.time >= from)
    }

    /// Tri stable (heure, nom du demandeur).
    pub fn sort(&mut self) {
        self.events.sort_by(ServiceEvent::chrono_cmp);
    }
}
