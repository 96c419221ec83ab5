use crate::model::{AppointmentId, DisplayedInterval, LaneAssignment};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Attribue un couloir à chaque intervalle d'une même clé (technicien, jour).
///
/// Partitionnement glouton : tri par début puis par id, premier couloir libre.
/// Le nombre de couloirs obtenu est la profondeur maximale de chevauchement.
pub fn assign_lanes(intervals: &[DisplayedInterval]) -> BTreeMap<AppointmentId, LaneAssignment> {
    let mut ordered: Vec<&DisplayedInterval> = intervals.iter().collect();
    ordered.sort_by(|a, b| start_then_id(a, b));

    // fin du dernier intervalle placé, par couloir
    let mut lane_ends: Vec<u32> = Vec::new();
    let mut placed: Vec<(AppointmentId, u32)> = Vec::with_capacity(ordered.len());

    for interval in ordered {
        let lane = match lane_ends
            .iter()
            .position(|&end| end <= interval.start_offset_minutes)
        {
            Some(lane) => lane,
            None => {
                lane_ends.push(0);
                lane_ends.len() - 1
            }
        };
        lane_ends[lane] = interval.end_offset_minutes();
        placed.push((interval.appointment_id.clone(), lane as u32));
    }

    let lane_count = lane_ends.len() as u32;
    placed
        .into_iter()
        .map(|(id, lane_index)| {
            (
                id,
                LaneAssignment {
                    lane_index,
                    lane_count,
                },
            )
        })
        .collect()
}

/// Nombre maximal d'intervalles couvrant un même instant (balayage).
pub fn max_overlap_depth(intervals: &[DisplayedInterval]) -> u32 {
    let mut events: Vec<(u32, i32)> = Vec::with_capacity(intervals.len() * 2);
    for interval in intervals {
        events.push((interval.start_offset_minutes, 1));
        events.push((interval.end_offset_minutes(), -1));
    }
    // à position égale, les fins passent avant les débuts
    events.sort_unstable();

    let mut depth = 0i32;
    let mut max = 0i32;
    for (_, delta) in events {
        depth += delta;
        max = max.max(depth);
    }
    max as u32
}

pub(super) fn start_then_id(a: &DisplayedInterval, b: &DisplayedInterval) -> Ordering {
    a.start_offset_minutes
        .cmp(&b.start_offset_minutes)
        .then_with(|| a.appointment_id.cmp(&b.appointment_id))
}
