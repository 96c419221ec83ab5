use super::geometry::Axis;
use crate::model::AppointmentId;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration du moteur, validée une seule fois par `LayoutEngine::new`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Ouverture, en minutes depuis minuit (`"HH:MM"` dans le fichier)
    #[cfg_attr(feature = "serde", serde(rename = "open", with = "crate::config::hhmm"))]
    pub open_minute: u32,
    /// Fermeture, exclue ; `24:00` autorisé
    #[cfg_attr(feature = "serde", serde(rename = "close", with = "crate::config::hhmm"))]
    pub close_minute: u32,
    pub time_zone: String,
    pub minimum_display_minutes: u32,
    pub include_empty_resource_rows: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub scale: Option<ScaleConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            open_minute: 8 * 60,
            close_minute: 18 * 60,
            time_zone: "UTC".to_string(),
            minimum_display_minutes: 0,
            include_empty_resource_rows: false,
            scale: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleConfig {
    pub pixels_per_minute: f64,
    pub track_extent: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub axis: Axis,
}

/// Options de présentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    pub minimum_display_minutes: u32,
    pub include_empty_resource_rows: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid interval for appointment {0}: end must be strictly after start")]
    InvalidInterval(AppointmentId),
    #[error("duplicate appointment id: {0}")]
    DuplicateAppointment(AppointmentId),
    #[error("unknown time zone: {0:?}")]
    InvalidTimeZone(String),
    #[error("invalid business window: {0}")]
    InvalidWindow(String),
    #[error("invalid scale: {0}")]
    InvalidScale(&'static str),
    #[error("invalid day range: end day is before start day")]
    InvalidDayRange,
}
