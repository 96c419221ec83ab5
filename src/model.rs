use crate::layout::LayoutError;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiant fort pour Appointment (ordre total, sert de départage)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour un technicien (ressource)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ligne d'une vue : un technicien, ou la ligne « non assigné » (toujours en dernier).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResourceKey {
    Assigned(ResourceId),
    Unassigned,
}

impl ResourceKey {
    pub fn from_option(resource: Option<&ResourceId>) -> Self {
        match resource {
            Some(id) => Self::Assigned(id.clone()),
            None => Self::Unassigned,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned(id) => write!(f, "{id}"),
            Self::Unassigned => f.write_str("-"),
        }
    }
}

/// Rendez-vous (UTC). Le `payload` est transmis tel quel, jamais inspecté.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Appointment<P = ()> {
    pub id: AppointmentId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: Option<ResourceId>,
    pub payload: P,
}

impl<P> Appointment<P> {
    /// Crée un rendez-vous en validant que `end > start`.
    pub fn new(
        id: AppointmentId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resource: Option<ResourceId>,
        payload: P,
    ) -> Result<Self, LayoutError> {
        if end <= start {
            return Err(LayoutError::InvalidInterval(id));
        }
        Ok(Self {
            id,
            start,
            end,
            resource,
            payload,
        })
    }

    /// Durée en minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey::from_option(self.resource.as_ref())
    }
}

/// Heures d'ouverture quotidiennes `[open, close)` dans le fuseau de référence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessWindow {
    pub open_minute: u32,
    pub close_minute: u32,
    pub time_zone: Tz,
}

impl BusinessWindow {
    /// Nombre de minutes de la fenêtre (toujours > 0 une fois validée).
    pub fn length_minutes(&self) -> u32 {
        self.close_minute - self.open_minute
    }
}

/// Portion visible d'un rendez-vous pour un jour calendaire donné.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayedInterval {
    pub appointment_id: AppointmentId,
    pub day: NaiveDate,
    pub start_offset_minutes: u32,
    pub duration_minutes: u32,
}

impl DisplayedInterval {
    pub fn end_offset_minutes(&self) -> u32 {
        self.start_offset_minutes + self.duration_minutes
    }

    pub fn overlaps(&self, other: &DisplayedInterval) -> bool {
        self.start_offset_minutes < other.end_offset_minutes()
            && other.start_offset_minutes < self.end_offset_minutes()
    }
}

/// Couloir attribué à un intervalle au sein d'une clé de regroupement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneAssignment {
    pub lane_index: u32,
    pub lane_count: u32,
}
