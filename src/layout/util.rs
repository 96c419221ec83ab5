use super::types::LayoutError;
use crate::model::Appointment;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashSet;

/// Rejets d'entrée, dans l'ordre des rendez-vous.
pub(super) fn input_errors<P>(
    appointments: &[Appointment<P>],
) -> impl Iterator<Item = LayoutError> + '_ {
    let mut seen = HashSet::with_capacity(appointments.len());
    appointments.iter().filter_map(move |a| {
        if a.end <= a.start {
            return Some(LayoutError::InvalidInterval(a.id.clone()));
        }
        if !seen.insert(&a.id) {
            return Some(LayoutError::DuplicateAppointment(a.id.clone()));
        }
        None
    })
}

/// Jours de `from` à `to` inclus.
pub fn day_span(from: NaiveDate, to: NaiveDate) -> Result<Vec<NaiveDate>, LayoutError> {
    if to < from {
        return Err(LayoutError::InvalidDayRange);
    }
    Ok(from.iter_days().take_while(|d| *d <= to).collect())
}

/// Semaine ISO (lundi → dimanche) contenant `day`.
pub fn week_of(day: NaiveDate) -> Vec<NaiveDate> {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    monday.iter_days().take(7).collect()
}
