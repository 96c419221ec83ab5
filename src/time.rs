//! Conversion canonique instant UTC → heure murale du fuseau de référence.
//!
//! Toutes les étapes du pipeline passent par ce module : aucun calcul de jour
//! calendaire ne doit être fait ailleurs.

use crate::layout::LayoutError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Heure murale locale : jour calendaire + minute du jour (secondes tronquées).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallClock {
    pub date: NaiveDate,
    pub minute_of_day: u32,
}

impl WallClock {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
    pub fn month(&self) -> u32 {
        self.date.month()
    }
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// Résout un identifiant IANA (`Europe/Paris`, `UTC`, ...).
pub fn resolve_time_zone(raw: &str) -> Result<Tz, LayoutError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LayoutError::InvalidTimeZone(raw.to_string()));
    }
    trimmed.parse::<Tz>().map_err(|err| {
        tracing::warn!(timezone = %trimmed, error = %err, "invalid timezone id");
        LayoutError::InvalidTimeZone(trimmed.to_string())
    })
}

pub fn normalize(instant: DateTime<Utc>, tz: &Tz) -> WallClock {
    let local = instant.with_timezone(tz);
    WallClock {
        date: local.date_naive(),
        minute_of_day: local.hour() * 60 + local.minute(),
    }
}

/// Instants UTC du début du jour `day` et du début du jour suivant.
///
/// Si minuit tombe dans un trou de changement d'heure, on prend la première
/// heure locale valide qui suit.
pub fn day_bounds(day: NaiveDate, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_instant(day, 0, tz)?;
    let end = local_instant(day.succ_opt()?, 0, tz)?;
    Some((start, end))
}

/// Instants UTC d'ouverture et de fermeture du jour `day`.
///
/// `close_minute == 1440` désigne minuit du lendemain. Les deux bornes suivent
/// la même règle que `day_bounds` pour les heures locales inexistantes ; une
/// heure locale répétée prend sa première occurrence.
pub fn window_bounds(
    day: NaiveDate,
    open_minute: u32,
    close_minute: u32,
    tz: &Tz,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let open = local_instant(day, open_minute, tz)?;
    let close = local_instant(day, close_minute, tz)?;
    Some((open, close))
}

/// Premier instant UTC dont l'heure locale est `day` + `minute_of_day` ou la suit.
pub fn local_instant(day: NaiveDate, minute_of_day: u32, tz: &Tz) -> Option<DateTime<Utc>> {
    let wall = day.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute_of_day));
    (0..MINUTES_PER_DAY).find_map(|shift| {
        tz.from_local_datetime(&(wall + Duration::minutes(i64::from(shift))))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}
