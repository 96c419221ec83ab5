#![forbid(unsafe_code)]
//! Atelier — moteur de mise en page des rendez-vous d'un planning par technicien.
//!
//! - Conversion unique instant UTC → heure murale du fuseau de référence.
//! - Découpage par jour dans la fenêtre d'ouverture (même règle pour toutes les vues).
//! - Attribution de couloirs sans chevauchement, en nombre minimal.
//! - Calcul pur : aucune E/S, aucun état, entrées jamais modifiées.

#[cfg(feature = "serde")]
pub mod config;
#[cfg(feature = "serde")]
pub mod io;
pub mod layout;
pub mod model;
pub mod time;

#[cfg(feature = "serde")]
pub use config::{export_config_json, load_config_from_file};
pub use layout::{
    assign_lanes, clip, day_span, max_overlap_depth, to_geometry, week_of, Axis, EngineConfig,
    Geometry, LaidOutBlock, LayoutEngine, LayoutError, LayoutOptions, Scale, ScaleConfig, View,
};
pub use model::{
    Appointment, AppointmentId, BusinessWindow, DisplayedInterval, LaneAssignment, ResourceId,
    ResourceKey,
};
pub use time::{normalize, resolve_time_zone, WallClock};
