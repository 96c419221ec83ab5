use super::types::LayoutError;
use crate::model::{DisplayedInterval, LaneAssignment};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sens de l'axe du temps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Vues jour/semaine : le temps descend, les couloirs se partagent la largeur
    #[default]
    Vertical,
    /// Gantt : le temps va vers la droite, les couloirs se partagent la hauteur
    Horizontal,
}

/// Échelle linéaire minutes → pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pixels_per_minute: f64,
    track_extent: f64,
    axis: Axis,
    minimum_display_minutes: u32,
}

impl Scale {
    pub fn new(
        pixels_per_minute: f64,
        track_extent: f64,
        axis: Axis,
        minimum_display_minutes: u32,
    ) -> Result<Self, LayoutError> {
        if !pixels_per_minute.is_finite() || pixels_per_minute <= 0.0 {
            return Err(LayoutError::InvalidScale("pixels_per_minute must be > 0"));
        }
        if !track_extent.is_finite() || track_extent <= 0.0 {
            return Err(LayoutError::InvalidScale("track_extent must be > 0"));
        }
        Ok(Self {
            pixels_per_minute,
            track_extent,
            axis,
            minimum_display_minutes,
        })
    }

    pub fn pixels_per_minute(&self) -> f64 {
        self.pixels_per_minute
    }
    pub fn track_extent(&self) -> f64 {
        self.track_extent
    }
    pub fn axis(&self) -> Axis {
        self.axis
    }
    pub fn minimum_display_minutes(&self) -> u32 {
        self.minimum_display_minutes
    }

    /// Longueur en pixels d'une fenêtre de `minutes` minutes.
    pub fn time_extent(&self, minutes: u32) -> f64 {
        f64::from(minutes) * self.pixels_per_minute
    }
}

/// Rectangle relatif au coin de la cellule (technicien, jour).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Le plancher d'affichage agrandit le bloc sans toucher `duration_minutes`.
pub fn to_geometry(interval: &DisplayedInterval, lane: &LaneAssignment, scale: &Scale) -> Geometry {
    let time_offset = scale.time_extent(interval.start_offset_minutes);
    let time_length =
        scale.time_extent(interval.duration_minutes.max(scale.minimum_display_minutes));

    let track = scale.track_extent / f64::from(lane.lane_count.max(1));
    let lane_offset = f64::from(lane.lane_index) * track;

    match scale.axis {
        Axis::Vertical => Geometry {
            left: lane_offset,
            top: time_offset,
            width: track,
            height: time_length,
        },
        Axis::Horizontal => Geometry {
            left: time_offset,
            top: lane_offset,
            width: time_length,
            height: track,
        },
    }
}
