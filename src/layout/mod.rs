mod clip;
mod geometry;
mod lanes;
mod types;
mod util;
mod view;

pub use clip::clip;
pub use geometry::{to_geometry, Axis, Geometry, Scale};
pub use lanes::{assign_lanes, max_overlap_depth};
pub use types::{EngineConfig, LayoutError, LayoutOptions, ScaleConfig};
pub use util::{day_span, week_of};
pub use view::{LaidOutBlock, Row, View};

use crate::model::{Appointment, BusinessWindow, DisplayedInterval, ResourceId};
use crate::time;
use chrono::{DateTime, NaiveDate, Utc};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// LayoutEngine : configuration validée, calcul pur et sans état
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    window: BusinessWindow,
    options: LayoutOptions,
    scale: Option<Scale>,
}

impl LayoutEngine {
    /// Échoue immédiatement sur une fenêtre, un fuseau ou une échelle invalide.
    pub fn new(config: EngineConfig) -> Result<Self, LayoutError> {
        if config.open_minute >= config.close_minute {
            return Err(LayoutError::InvalidWindow(format!(
                "open ({}) must be before close ({})",
                config.open_minute, config.close_minute
            )));
        }
        if config.close_minute > MINUTES_PER_DAY {
            return Err(LayoutError::InvalidWindow(format!(
                "close ({}) is past the end of the day",
                config.close_minute
            )));
        }
        let time_zone = time::resolve_time_zone(&config.time_zone)?;

        let scale = config
            .scale
            .map(|s| {
                Scale::new(
                    s.pixels_per_minute,
                    s.track_extent,
                    s.axis,
                    config.minimum_display_minutes,
                )
            })
            .transpose()?;

        Ok(Self {
            window: BusinessWindow {
                open_minute: config.open_minute,
                close_minute: config.close_minute,
                time_zone,
            },
            options: LayoutOptions {
                minimum_display_minutes: config.minimum_display_minutes,
                include_empty_resource_rows: config.include_empty_resource_rows,
            },
            scale,
        })
    }

    pub fn window(&self) -> &BusinessWindow {
        &self.window
    }
    pub fn options(&self) -> LayoutOptions {
        self.options
    }
    pub fn scale(&self) -> Option<&Scale> {
        self.scale.as_ref()
    }

    /// Premier rendez-vous rejeté (fin ≤ début, ou id dupliqué).
    pub fn validate<P>(&self, appointments: &[Appointment<P>]) -> Result<(), LayoutError> {
        match util::input_errors(appointments).next() {
            Some(err) => {
                tracing::warn!(error = %err, "appointment rejected");
                Err(err)
            }
            None => Ok(()),
        }
    }

    pub fn validate_all<P>(&self, appointments: &[Appointment<P>]) -> Vec<LayoutError> {
        util::input_errors(appointments).collect()
    }

    pub fn clip<P>(&self, appointment: &Appointment<P>, day: NaiveDate) -> Option<DisplayedInterval> {
        clip::clip(appointment, day, &self.window)
    }

    /// Minutes réellement écoulées entre l'ouverture et la fermeture du jour
    /// (`close - open`, sauf si un changement d'heure tombe dans la fenêtre).
    pub fn window_minutes(&self, day: NaiveDate) -> Option<u32> {
        let (open, close) = time::window_bounds(
            day,
            self.window.open_minute,
            self.window.close_minute,
            &self.window.time_zone,
        )?;
        clip::minutes_up(close - open)
    }

    /// Construit la vue (technicien × jour) ; `roster` liste les techniciens
    /// à afficher même sans rendez-vous quand `include_empty_resource_rows`.
    pub fn build_view<'a, P>(
        &self,
        appointments: &'a [Appointment<P>],
        days: &[NaiveDate],
        roster: &[ResourceId],
    ) -> Result<View<'a, P>, LayoutError> {
        view::build_view(self, appointments, days, roster)
    }

    /// Plage UTC couvrant les jours demandés, à fournir au service de récupération.
    pub fn query_range(&self, days: &[NaiveDate]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = days.iter().min()?;
        let last = days.iter().max()?;
        let (start, _) = time::day_bounds(*first, &self.window.time_zone)?;
        let (_, end) = time::day_bounds(*last, &self.window.time_zone)?;
        Some((start, end))
    }
}
