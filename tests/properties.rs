#![forbid(unsafe_code)]
//! Propriétés vérifiées sur des jeux aléatoires (graine fixe).

use atelier::{
    assign_lanes, max_overlap_depth,
    layout::{EngineConfig, LayoutEngine, View},
    model::{Appointment, AppointmentId, DisplayedInterval, ResourceId},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x0A7E_11E2;
const WINDOW: u32 = 600;

fn day0() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
}

fn random_intervals(rng: &mut ChaCha8Rng, n: usize) -> Vec<DisplayedInterval> {
    (0..n)
        .map(|i| {
            let start = rng.random_range(0..WINDOW - 1);
            let duration = rng.random_range(1..=(WINDOW - start).min(180));
            DisplayedInterval {
                appointment_id: AppointmentId::new(format!("i{i:03}")),
                day: day0(),
                start_offset_minutes: start,
                duration_minutes: duration,
            }
        })
        .collect()
}

fn brute_force_depth(intervals: &[DisplayedInterval]) -> u32 {
    (0..WINDOW)
        .map(|t| {
            intervals
                .iter()
                .filter(|i| i.start_offset_minutes <= t && t < i.end_offset_minutes())
                .count() as u32
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn lanes_never_overlap_and_count_is_optimal() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    for round in 0..200 {
        let n = rng.random_range(0..40);
        let intervals = random_intervals(&mut rng, n);
        let lanes = assign_lanes(&intervals);
        assert_eq!(lanes.len(), intervals.len());

        for (i, a) in intervals.iter().enumerate() {
            let la = lanes[&a.appointment_id];
            for b in intervals.iter().skip(i + 1) {
                let lb = lanes[&b.appointment_id];
                if la.lane_index == lb.lane_index {
                    assert!(!a.overlaps(b), "round {round}: {a:?} and {b:?} share a lane");
                }
            }
        }

        let expected = brute_force_depth(&intervals);
        assert_eq!(max_overlap_depth(&intervals), expected, "round {round}");
        for assignment in lanes.values() {
            assert_eq!(assignment.lane_count, expected, "round {round}");
            assert!(assignment.lane_index < assignment.lane_count);
        }
    }
}

#[test]
fn identical_intervals_take_distinct_lanes() {
    let intervals: Vec<DisplayedInterval> = ["b", "a", "c"]
        .iter()
        .map(|id| DisplayedInterval {
            appointment_id: AppointmentId::new(id),
            day: day0(),
            start_offset_minutes: 30,
            duration_minutes: 45,
        })
        .collect();
    let lanes = assign_lanes(&intervals);
    assert_eq!(lanes[&AppointmentId::new("a")].lane_index, 0);
    assert_eq!(lanes[&AppointmentId::new("b")].lane_index, 1);
    assert_eq!(lanes[&AppointmentId::new("c")].lane_index, 2);
    assert!(lanes.values().all(|l| l.lane_count == 3));
}

fn random_appointments(rng: &mut ChaCha8Rng, n: usize) -> Vec<Appointment> {
    let base = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
    let techs = ["t1", "t2", "t3"];
    (0..n)
        .map(|i| {
            let start = base + Duration::minutes(rng.random_range(0..5 * 24 * 60));
            let end = start + Duration::minutes(rng.random_range(1..3 * 24 * 60));
            let resource = match rng.random_range(0..4) {
                3 => None,
                t => Some(ResourceId::new(techs[t])),
            };
            Appointment {
                id: AppointmentId::new(format!("a{i:03}")),
                start,
                end,
                resource,
                payload: (),
            }
        })
        .collect()
}

fn snapshot(view: &View<'_, ()>) -> Vec<String> {
    view.blocks()
        .map(|(key, b)| {
            format!(
                "{key}/{}/{}/{}+{}/{}of{}",
                b.day,
                b.appointment_id,
                b.start_offset_minutes,
                b.duration_minutes,
                b.lane_index,
                b.lane_count
            )
        })
        .collect()
}

#[test]
fn layout_is_independent_of_input_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xBEEF);
    let engine = LayoutEngine::new(EngineConfig::default()).unwrap();
    let days: Vec<NaiveDate> = day0().iter_days().take(7).collect();

    for _ in 0..50 {
        let n = rng.random_range(1..60);
        let original = random_appointments(&mut rng, n);
        let mut shuffled = original.clone();
        shuffled.shuffle(&mut rng);

        let a = engine.build_view(&original, &days, &[]).unwrap();
        let b = engine.build_view(&shuffled, &days, &[]).unwrap();
        assert_eq!(snapshot(&a), snapshot(&b));
    }
}

fn minutes_inside_windows(start: DateTime<Utc>, end: DateTime<Utc>, open: u32, close: u32) -> i64 {
    let first = start.date_naive();
    let last = end.date_naive();
    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| {
            let midnight = Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap());
            let ws = midnight + Duration::minutes(i64::from(open));
            let we = midnight + Duration::minutes(i64::from(close));
            let from = start.max(ws);
            let to = end.min(we);
            (to - from).num_minutes().max(0)
        })
        .sum()
}

#[test]
fn clipping_neither_gains_nor_loses_minutes() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xC11F);
    let engine = LayoutEngine::new(EngineConfig::default()).unwrap();
    let window = engine.window();

    for appointment in random_appointments(&mut rng, 300) {
        let first = appointment.start.date_naive();
        let last = appointment.end.date_naive();
        let shown: i64 = first
            .pred_opt()
            .unwrap()
            .iter_days()
            .take_while(|d| *d <= last.succ_opt().unwrap())
            .filter_map(|d| engine.clip(&appointment, d))
            .map(|i| {
                assert!(i.end_offset_minutes() <= window.length_minutes());
                i64::from(i.duration_minutes)
            })
            .sum();
        let expected = minutes_inside_windows(
            appointment.start,
            appointment.end,
            window.open_minute,
            window.close_minute,
        );
        assert_eq!(shown, expected, "{appointment:?}");
    }
}

/// Instant UTC de `day` + `minute` dans `tz` (première occurrence si répétée).
fn local(tz: &Tz, day: NaiveDate, minute: u32) -> DateTime<Utc> {
    let wall = day.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute));
    tz.from_local_datetime(&wall)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

fn local_minutes_inside_windows(
    tz: &Tz,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    open: u32,
    close: u32,
) -> i64 {
    let first = start.with_timezone(tz).date_naive().pred_opt().unwrap();
    let last = end.with_timezone(tz).date_naive().succ_opt().unwrap();
    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| {
            let from = start.max(local(tz, d, open));
            let to = end.min(local(tz, d, close));
            (to - from).num_minutes().max(0)
        })
        .sum()
}

#[test]
fn clipping_keeps_real_minutes_across_dst_changes() {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xD57);
    let changes = [
        (2025, 3, 9),
        (2025, 3, 30),
        (2025, 10, 26),
        (2025, 11, 2),
    ];
    // 01:00–03:00 encadre le changement dans les deux fuseaux
    let windows = [(0, 24 * 60), (60, 180), (480, 1080)];

    for zone in ["America/New_York", "Europe/Paris"] {
        let tz: Tz = zone.parse().unwrap();
        for (open, close) in windows {
            let engine = LayoutEngine::new(EngineConfig {
                open_minute: open,
                close_minute: close,
                time_zone: zone.into(),
                ..EngineConfig::default()
            })
            .unwrap();

            for (y, m, d) in changes {
                let base = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap() - Duration::days(2);
                for i in 0..60 {
                    let start = base + Duration::minutes(rng.random_range(0..4 * 24 * 60));
                    let end = start + Duration::minutes(rng.random_range(1..2 * 24 * 60));
                    let appointment = Appointment {
                        id: AppointmentId::new(format!("d{i:02}")),
                        start,
                        end,
                        resource: None,
                        payload: (),
                    };

                    let first = start.with_timezone(&tz).date_naive().pred_opt().unwrap();
                    let last = end.with_timezone(&tz).date_naive().succ_opt().unwrap();
                    let shown: i64 = first
                        .iter_days()
                        .take_while(|day| *day <= last)
                        .filter_map(|day| engine.clip(&appointment, day).map(|i| (day, i)))
                        .map(|(day, i)| {
                            assert!(i.duration_minutes > 0);
                            assert!(
                                i.end_offset_minutes() <= engine.window_minutes(day).unwrap(),
                                "{zone} {appointment:?}"
                            );
                            i64::from(i.duration_minutes)
                        })
                        .sum();
                    let expected = local_minutes_inside_windows(&tz, start, end, open, close);
                    assert_eq!(shown, expected, "{zone} [{open}, {close}) {appointment:?}");
                }
            }
        }
    }
}

#[test]
fn single_day_inside_window_is_untouched() {
    let engine = LayoutEngine::new(EngineConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0x51);
    let midnight = Utc.with_ymd_and_hms(2025, 10, 6, 0, 0, 0).unwrap();
    for _ in 0..100 {
        let start = rng.random_range(480..1079);
        let end = rng.random_range(start + 1..=1080);
        let a = Appointment {
            id: AppointmentId::new("x"),
            start: midnight + Duration::minutes(i64::from(start)),
            end: midnight + Duration::minutes(i64::from(end)),
            resource: None,
            payload: (),
        };
        let i = engine.clip(&a, day0()).unwrap();
        assert_eq!(i.start_offset_minutes, start - 480);
        assert_eq!(i.duration_minutes, end - start);
    }
}
