use crate::scheduler::PlanOptions;
use crate::time::{Duration, FormatError};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Marqueur de disponibilité d'un membre en repos hebdomadaire.
pub const WEEKLY_LEAVE: &str = "weekly leave";

/// Marqueur d'une demande réorientée (aucun soignant affecté).
pub const REDIRECTED: &str = "redirected to other network";

/// Disponibilité d'un soignant : une heure résolue, ou le repos hebdomadaire.
///
/// Le repos hebdomadaire n'a pas d'heure : toute comparaison qui l'implique
/// est fausse (`==`, `<`, `>` renvoient `false`), y compris avec lui-même.
#[derive(Debug, Clone, Copy)]
pub enum Availability {
    At(Duration),
    WeeklyLeave,
}

impl Availability {
    pub fn time(self) -> Option<Duration> {
        match self {
            Self::At(t) => Some(t),
            Self::WeeklyLeave => None,
        }
    }
}

impl PartialEq for Availability {
    fn eq(&self, other: &Self) -> bool {
        matches!((self, other), (Self::At(a), Self::At(b)) if a == b)
    }
}

impl PartialOrd for Availability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::At(a), Self::At(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(t) => fmt::Display::fmt(t, f),
            Self::WeeklyLeave => f.write_str(WEEKLY_LEAVE),
        }
    }
}

impl FromStr for Availability {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WEEKLY_LEAVE {
            return Ok(Self::WeeklyLeave);
        }
        Duration::parse(s)
            .map(Self::At)
            .map_err(|_| FormatError::new("availability", s))
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Soignant (membre du personnel)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Staff {
    pub name: String,
    /// Rang de qualification, plus haut = plus qualifié.
    pub category: u8,
    pub availability: Availability,
    pub minutes_today: u32,
    pub weekly: Duration,
}

impl Staff {
    pub fn new<N: Into<String>>(
        name: N,
        category: u8,
        availability: Availability,
        minutes_today: u32,
        weekly: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            availability,
            minutes_today,
            weekly,
        }
    }

    pub fn has_reached_weekly_limit(&self, opts: &PlanOptions) -> bool {
        self.weekly >= opts.max_weekly
    }

    pub fn is_on_leave(&self) -> bool {
        matches!(self.availability, Availability::WeeklyLeave)
    }

    /// Pause quotidienne : si les minutes du jour tombent dans
    /// `[break_after, break_after + band)`, la disponibilité recule d'une pause.
    /// Renvoie `true` si la pause a été appliquée.
    pub fn check_daily_break(&mut self, opts: &PlanOptions) -> bool {
        let start = opts.break_after_minutes;
        let end = start.saturating_add(opts.break_band_minutes);
        if !(start..end).contains(&self.minutes_today) {
            return false;
        }
        match self.availability {
            Availability::At(t) => {
                self.availability = Availability::At(t.advance(opts.daily_break));
                true
            }
            Availability::WeeklyLeave => false,
        }
    }

    /// Créneau d'intervention `(heure d'intervention, nouvelle disponibilité)`.
    ///
    /// Un soignant libre avant `next_start` est ramené à `next_start` ; un
    /// soignant déjà engagé plus tard garde son créneau. `None` en repos hebdomadaire.
    pub fn assistance_window(
        &self,
        next_start: Duration,
        opts: &PlanOptions,
    ) -> Option<(Duration, Duration)> {
        let available = self.availability.time()?;
        let start = if available < next_start { next_start } else { available };
        Some((start, start.advance(opts.encounter)))
    }

    /// Confirme une intervention : disponibilité repoussée, compteurs incrémentés.
    pub fn commit(&mut self, new_availability: Duration, opts: &PlanOptions) {
        self.availability = Availability::At(new_availability);
        let encounter = u32::try_from(opts.encounter.as_minutes()).unwrap_or(u32::MAX);
        self.minutes_today = self.minutes_today.saturating_add(encounter);
        self.weekly = self.weekly.advance(opts.encounter);
    }

    /// Ordre de sélection : disponibilité, catégorie (la plus basse d'abord),
    /// minutes du jour, temps hebdomadaire, nom.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        let by_availability = match (self.availability.time(), other.availability.time()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_availability
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.minutes_today.cmp(&other.minutes_today))
            .then_with(|| self.weekly.cmp(&other.weekly))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Staff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.name, self.category, self.availability, self.minutes_today, self.weekly
        )
    }
}

/// Niveau d'urgence d'une demande.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Urgency {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(FormatError::new("urgency", s)),
        }
    }
}

/// Bracelet de triage (étiquette secondaire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Yellow,
    Red,
}

impl Band {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl FromStr for Band {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            _ => Err(FormatError::new("band", s)),
        }
    }
}

/// Personne en attente d'une intervention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requester {
    pub name: String,
    pub age: u32,
    pub band: Band,
    pub urgency: Urgency,
}

impl Requester {
    pub fn new<N: Into<String>>(name: N, age: u32, band: Band, urgency: Urgency) -> Self {
        Self {
            name: name.into(),
            age,
            band,
            urgency,
        }
    }

    /// Urgence décroissante, bracelet décroissant, âge décroissant, puis nom.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .urgency
            .cmp(&self.urgency)
            .then_with(|| other.band.cmp(&self.band))
            .then_with(|| other.age.cmp(&self.age))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.name,
            self.age,
            self.band.as_str(),
            self.urgency.as_str()
        )
    }
}

/// Entités identifiées par un nom unique dans leur collection.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Staff {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Requester {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Référence à une entité : simple nom (lu d'un planning) ou fiche complète.
#[derive(Debug, Clone)]
pub enum Party<T> {
    Placeholder { name: String },
    Full(T),
}

impl<T: Named> Party<T> {
    pub fn placeholder<N: Into<String>>(name: N) -> Self {
        Self::Placeholder { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Placeholder { name } => name,
            Self::Full(record) => record.name(),
        }
    }

    pub fn as_full(&self) -> Option<&T> {
        match self {
            Self::Full(record) => Some(record),
            Self::Placeholder { .. } => None,
        }
    }

    /// Comparaison par identité (nom) quel que soit le variant.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl<T: Named + PartialEq> PartialEq for Party<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Full(a), Self::Full(b)) => a == b,
            (Self::Placeholder { name: a }, Self::Placeholder { name: b }) => a == b,
            _ => false,
        }
    }
}

impl Party<Requester> {
    /// Ordre de priorité ; dès qu'un côté n'est qu'un nom, seul le nom compte.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Full(a), Self::Full(b)) => a.priority_cmp(b),
            _ => self.name().cmp(other.name()),
        }
    }
}

impl<T: Named> Serialize for Party<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Rôle d'un fichier instantané.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Staff,
    Schedule,
    Requests,
}

impl Scope {
    /// Étiquette portée par l'en-tête du fichier.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Staff => "Doctors",
            Self::Schedule => "Schedule",
            Self::Requests => "Mothers",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Scope {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Doctors" => Ok(Self::Staff),
            "Schedule" => Ok(Self::Schedule),
            "Mothers" => Ok(Self::Requests),
            _ => Err(FormatError::new("scope", s)),
        }
    }
}

/// En-tête commun aux trois instantanés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub organization: String,
    pub time: Duration,
    pub date: NaiveDate,
    pub scope: Scope,
}

impl Header {
    pub const DATE_FORMAT: &'static str = "%d:%m:%Y";

    pub fn new<O: Into<String>>(organization: O, time: Duration, date: NaiveDate, scope: Scope) -> Self {
        Self {
            organization: organization.into(),
            time,
            date,
            scope,
        }
    }

    /// En-tête de la période suivante.
    pub fn next(&self, opts: &PlanOptions) -> Self {
        Self {
            time: self.time.advance(opts.period),
            ..self.clone()
        }
    }

    /// Nom de fichier sans extension : `<scope en minuscules><heure>`.
    pub fn file_stem(&self) -> String {
        format!("{}{}", self.scope.tag().to_lowercase(), self.time)
    }

    /// Ordre chronologique : date puis heure.
    pub fn period_cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date).then_with(|| self.time.cmp(&other.time))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Organization:\n{}\nTime:\n{}\nDate:\n{}\n{}:",
            self.organization,
            self.time,
            self.date.format(Self::DATE_FORMAT),
            self.scope
        )
    }
}
