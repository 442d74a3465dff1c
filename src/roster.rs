use crate::model::{Availability, Header, Requester, Staff};
use crate::scheduler::PlanOptions;

/// Effectif soignant d'une période.
#[derive(Debug, Clone)]
pub struct Roster {
    header: Header,
    staff: Vec<Staff>,
}

impl Roster {
    pub fn new(header: Header, staff: Vec<Staff>) -> Self {
        Self { header, staff }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    /// Accès en écriture par indice issu de `ranked_indices`/`select_best_match`.
    pub(crate) fn member_mut(&mut self, index: usize) -> &mut Staff {
        &mut self.staff[index]
    }

    pub fn find_by_name<'a>(&'a self, name: &str) -> Option<&'a Staff> {
        self.staff.iter().find(|s| s.name == name)
    }

    pub fn with_header(self, header: Header) -> Self {
        Self { header, ..self }
    }

    /// Indices des soignants éligibles, triés par priorité de sélection.
    ///
    /// Exclus : quota hebdomadaire atteint, repos hebdomadaire en cours.
    pub fn ranked_indices(&self, opts: &PlanOptions) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.staff.len())
            .filter(|&i| {
                let s = &self.staff[i];
                !s.has_reached_weekly_limit(opts) && !s.is_on_leave()
            })
            .collect();
        idx.sort_by(|&a, &b| self.staff[a].priority_cmp(&self.staff[b]));
        idx
    }

    /// Un soignant déjà en repos hebdomadaire reste exclu même si son compteur
    /// a été remis à zéro : la remise à zéro externe doit aussi lui rendre
    /// une heure de disponibilité.
    pub fn eligible_sorted_by_priority(&self, opts: &PlanOptions) -> Vec<&Staff> {
        self.ranked_indices(opts)
            .into_iter()
            .map(|i| &self.staff[i])
            .collect()
    }

    /// Meilleur candidat (indice dans l'effectif), sans réservation.
    ///
    /// L'appelant doit confirmer (`Staff::commit`) avant la sélection suivante,
    /// sinon le même soignant peut être proposé deux fois.
    pub fn select_best_match(&self, require_min_category: bool, opts: &PlanOptions) -> Option<usize> {
        self.ranked_indices(opts)
            .into_iter()
            .find(|&i| !require_min_category || self.staff[i].category >= opts.min_category)
    }

    /// Place en repos hebdomadaire tous ceux qui ont atteint le quota.
    /// Renvoie les noms concernés.
    pub fn apply_weekly_leave(&mut self, opts: &PlanOptions) -> Vec<String> {
        let mut placed = Vec::new();
        for s in self.staff.iter_mut() {
            if s.has_reached_weekly_limit(opts) {
                if !s.is_on_leave() {
                    placed.push(s.name.clone());
                }
                s.availability = Availability::WeeklyLeave;
            }
        }
        placed
    }
}

/// File des demandes en attente.
#[derive(Debug, Clone)]
pub struct RequestQueue {
    header: Header,
    requesters: Vec<Requester>,
}

impl RequestQueue {
    pub fn new(header: Header, requesters: Vec<Requester>) -> Self {
        Self { header, requesters }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn requesters(&self) -> &[Requester] {
        &self.requesters
    }

    /// Tri stable par priorité décroissante.
    pub fn sort_by_priority(&mut self) {
        self.requesters.sort_by(|a, b| a.priority_cmp(b));
    }
}
