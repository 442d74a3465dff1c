use chrono::TimeDelta;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Texte mal formé (heure, étiquette, marqueur).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: `{value}`")]
pub struct FormatError {
    pub kind: &'static str,
    pub value: String,
}

impl FormatError {
    pub fn new<S: Into<String>>(kind: &'static str, value: S) -> Self {
        Self { kind, value: value.into() }
    }
}

/// Heure du jour ou durée cumulée, au format `HHhMM`.
///
/// Les valeurs peuvent dépasser 24h (temps hebdomadaire cumulé) : aucun
/// repli modulo 24h n'est appliqué.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(TimeDelta);

impl Duration {
    pub fn from_minutes(minutes: u32) -> Self {
        Self(TimeDelta::minutes(i64::from(minutes)))
    }

    pub fn hm(hours: u32, minutes: u32) -> Self {
        Self::from_minutes(hours * 60 + minutes)
    }

    /// Décalage total en minutes.
    pub fn as_minutes(self) -> i64 {
        self.0.num_minutes()
    }

    /// Parse le format canonique : heures (1 chiffre ou plus), `h`, deux chiffres de minutes.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let err = || FormatError::new("time", text);
        let (hours, minutes) = text.split_once('h').ok_or_else(err)?;
        if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let hours: u32 = hours.parse().map_err(|_| err())?;
        let minutes: u32 = minutes.parse().map_err(|_| err())?;
        if minutes >= 60 {
            return Err(err());
        }
        let total = hours.checked_mul(60).and_then(|h| h.checked_add(minutes)).ok_or_else(err)?;
        Ok(Self::from_minutes(total))
    }

    /// Renvoie une nouvelle valeur avancée de `increment`.
    #[must_use]
    pub fn advance(self, increment: Duration) -> Duration {
        Duration(self.0 + increment.0)
    }

    pub fn is_positive(self) -> bool {
        self.0 > TimeDelta::zero()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.as_minutes();
        write!(f, "{:02}h{:02}", total / 60, total % 60)
    }
}

impl FromStr for Duration {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Duration::parse(&raw).map_err(de::Error::custom)
    }
}

/// Plage d'ouverture de l'établissement, bornes exclues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingHours {
    pub opening: Duration,
    pub closing: Duration,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            opening: Duration::hm(4, 0),
            closing: Duration::hm(20, 0),
        }
    }
}

impl OperatingHours {
    /// `opening < t < closing` : un instant pile à l'ouverture ou à la fermeture est hors plage.
    pub fn contains(&self, t: Duration) -> bool {
        self.opening < t && t < self.closing
    }
}
