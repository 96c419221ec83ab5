use super::geometry::{self, Geometry};
use super::{clip, lanes, LayoutEngine, LayoutError};
use crate::model::{Appointment, AppointmentId, DisplayedInterval, ResourceId, ResourceKey};
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::{btree_map, BTreeMap};

/// Bloc prêt à dessiner pour une cellule (technicien, jour).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LaidOutBlock<'a, P> {
    pub appointment_id: AppointmentId,
    pub day: NaiveDate,
    pub start_offset_minutes: u32,
    pub duration_minutes: u32,
    pub lane_index: u32,
    pub lane_count: u32,
    pub payload: &'a P,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub geometry: Option<Geometry>,
}

pub type Row<'a, P> = BTreeMap<NaiveDate, Vec<LaidOutBlock<'a, P>>>;

/// Vue calculée : lignes par technicien, colonnes par jour.
#[derive(Debug, Clone)]
pub struct View<'a, P> {
    days: Vec<NaiveDate>,
    rows: BTreeMap<ResourceKey, Row<'a, P>>,
}

impl<'a, P> View<'a, P> {
    /// Jours demandés, triés et sans doublon.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ResourceKey, &Row<'a, P>)> {
        self.rows.iter()
    }

    pub fn row(&self, resource: &ResourceKey) -> Option<&Row<'a, P>> {
        self.rows.get(resource)
    }

    pub fn resources(&self) -> btree_map::Keys<'_, ResourceKey, Row<'a, P>> {
        self.rows.keys()
    }

    pub fn cell(&self, resource: &ResourceKey, day: NaiveDate) -> &[LaidOutBlock<'a, P>] {
        self.rows
            .get(resource)
            .and_then(|row| row.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 0 pour une cellule vide.
    pub fn lane_count(&self, resource: &ResourceKey, day: NaiveDate) -> u32 {
        self.cell(resource, day)
            .first()
            .map_or(0, |block| block.lane_count)
    }

    /// Tous les blocs, ligne par ligne puis jour par jour.
    pub fn blocks(&self) -> impl Iterator<Item = (&ResourceKey, &LaidOutBlock<'a, P>)> {
        self.rows
            .iter()
            .flat_map(|(key, row)| row.values().flatten().map(move |block| (key, block)))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(super) fn build_view<'a, P>(
    engine: &LayoutEngine,
    appointments: &'a [Appointment<P>],
    days: &[NaiveDate],
    roster: &[ResourceId],
) -> Result<View<'a, P>, LayoutError> {
    engine.validate(appointments)?;

    let mut days = days.to_vec();
    days.sort_unstable();
    days.dedup();

    let mut groups: BTreeMap<(ResourceKey, NaiveDate), Vec<(DisplayedInterval, &'a P)>> =
        BTreeMap::new();
    for appointment in appointments {
        for &day in &days {
            if let Some(interval) = clip::clip(appointment, day, engine.window()) {
                groups
                    .entry((appointment.resource_key(), day))
                    .or_default()
                    .push((interval, &appointment.payload));
            }
        }
    }

    let mut rows: BTreeMap<ResourceKey, Row<'a, P>> = BTreeMap::new();
    if engine.options().include_empty_resource_rows {
        let known = roster
            .iter()
            .cloned()
            .map(ResourceKey::Assigned)
            .chain(appointments.iter().map(Appointment::resource_key));
        for key in known {
            rows.entry(key).or_insert_with(|| empty_row(&days));
        }
    }

    for ((key, day), mut members) in groups {
        members.sort_by(|(a, _), (b, _)| lanes::start_then_id(a, b));
        let (intervals, payloads): (Vec<DisplayedInterval>, Vec<&'a P>) =
            members.into_iter().unzip();
        let assignments = lanes::assign_lanes(&intervals);

        let mut blocks = Vec::with_capacity(intervals.len());
        for (interval, payload) in intervals.into_iter().zip(payloads) {
            let Some(lane) = assignments.get(&interval.appointment_id).copied() else {
                continue;
            };
            let geometry = engine
                .scale()
                .map(|scale| geometry::to_geometry(&interval, &lane, scale));
            blocks.push(LaidOutBlock {
                appointment_id: interval.appointment_id,
                day,
                start_offset_minutes: interval.start_offset_minutes,
                duration_minutes: interval.duration_minutes,
                lane_index: lane.lane_index,
                lane_count: lane.lane_count,
                payload,
                geometry,
            });
        }

        tracing::debug!(
            resource = %key,
            %day,
            blocks = blocks.len(),
            lanes = blocks.first().map_or(0, |b| b.lane_count),
            "cell laid out"
        );
        rows.entry(key)
            .or_insert_with(|| empty_row(&days))
            .insert(day, blocks);
    }

    Ok(View { days, rows })
}

fn empty_row<'a, P>(days: &[NaiveDate]) -> Row<'a, P> {
    days.iter().map(|&day| (day, Vec::new())).collect()
}
