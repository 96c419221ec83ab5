use crate::model::{Appointment, BusinessWindow, DisplayedInterval};
use crate::time;
use chrono::{Duration, NaiveDate};

/// Portion d'un rendez-vous visible le jour `day`, bornée à la fenêtre d'ouverture.
///
/// Même règle pour toutes les vues (jour, semaine, Gantt) :
/// - rendez-vous sur un seul jour local : `[début, fin)` ∩ `[open, close)` ;
/// - sur plusieurs jours : `[début, close)` le premier jour, `[open, fin)` le
///   dernier, la fenêtre entière les jours intermédiaires.
///
/// L'intersection se fait sur les instants UTC d'ouverture et de fermeture du
/// jour (`time::window_bounds`) : décalage et durée sont des minutes écoulées
/// depuis l'ouverture, y compris les jours de changement d'heure. Le début est
/// arrondi à la minute inférieure, la fin à la minute supérieure ; un
/// rendez-vous de moins d'une minute occupe donc une minute.
///
/// `None` si le rendez-vous ne touche pas ce jour ou si la portion est vide.
pub fn clip<P>(
    appointment: &Appointment<P>,
    day: NaiveDate,
    window: &BusinessWindow,
) -> Option<DisplayedInterval> {
    if appointment.end <= appointment.start {
        return None;
    }

    let (open, close) = time::window_bounds(
        day,
        window.open_minute,
        window.close_minute,
        &window.time_zone,
    )?;
    let from = appointment.start.max(open);
    let to = appointment.end.min(close);
    if to <= from {
        return None;
    }

    let length = minutes_up(close - open)?;
    let offset = minutes_down(from - open)?;
    let end = minutes_up(to - open)?.min(length);

    Some(DisplayedInterval {
        appointment_id: appointment.id.clone(),
        day,
        start_offset_minutes: offset,
        duration_minutes: end - offset,
    })
}

fn minutes_down(elapsed: Duration) -> Option<u32> {
    u32::try_from(elapsed.num_minutes()).ok()
}

pub(super) fn minutes_up(elapsed: Duration) -> Option<u32> {
    let whole = elapsed.num_minutes();
    let partial = elapsed > Duration::minutes(whole);
    u32::try_from(whole + i64::from(partial)).ok()
}
