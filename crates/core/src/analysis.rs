//! Post-run read-only analysis of a finished grid.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use types::{
    CourseCode, CoverageEntry, CoverageStatus, DayOfWeek, EngineConfig, Instance, Metrics, RoomId,
    TeacherId,
};

use crate::grid::{Problem, Timetable};
use crate::scoring::pstdev;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summaries {
    pub total_sessions: u32,
    pub teacher: BTreeMap<TeacherId, u32>,
    pub room: BTreeMap<RoomId, u32>,
    pub day: BTreeMap<DayOfWeek, u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub summaries: Summaries,
    pub coverage: BTreeMap<CourseCode, CoverageEntry>,
    pub warnings: Vec<String>,
    pub metrics: Metrics,
}

pub fn summarize(p: &Problem<'_>, tt: &Timetable) -> Summaries {
    let mut teacher: BTreeMap<TeacherId, u32> = BTreeMap::new();
    let mut room: BTreeMap<RoomId, u32> = p
        .instance
        .rooms
        .iter()
        .map(|r| (r.name.clone(), 0))
        .collect();
    let mut total_sessions = 0u32;

    for (_day, _slot, r, ci) in tt.occupied() {
        total_sessions += 1;
        *room.entry(p.instance.rooms[r].name.clone()).or_default() += 1;
        *teacher.entry(p.course(ci).teacher.clone()).or_default() += 1;
    }

    let day = tt
        .day_loads()
        .iter()
        .enumerate()
        .map(|(d, &n)| (p.day(d), n))
        .collect();

    Summaries {
        total_sessions,
        teacher,
        room,
        day,
    }
}

/// Required vs scheduled hours per course, counted straight from the cells.
pub fn coverage(p: &Problem<'_>, tt: &Timetable) -> BTreeMap<CourseCode, CoverageEntry> {
    let mut scheduled: HashMap<&str, u32> = HashMap::new();
    for (_, _, _, ci) in tt.occupied() {
        *scheduled.entry(p.course(ci).code.0.as_str()).or_default() += 1;
    }

    p.instance
        .courses
        .iter()
        .map(|c| {
            let n = scheduled.get(c.code.0.as_str()).copied().unwrap_or(0);
            let status = if n >= c.hours {
                CoverageStatus::Ok
            } else {
                CoverageStatus::Missing
            };
            (
                c.code.clone(),
                CoverageEntry {
                    required: c.hours,
                    scheduled: n,
                    batch: c.batch.clone(),
                    status,
                },
            )
        })
        .collect()
}

/// Capacity checks on the input alone; placement outcome plays no part.
pub fn feasibility_warnings(inst: &Instance, config: &EngineConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let days = config.days.len() as u64;
    let slots = config.slots_per_day as u64;

    let total_slots = days * slots * inst.rooms.len() as u64;
    let total_required: u64 = inst.courses.iter().map(|c| c.hours as u64).sum();
    if total_required > total_slots {
        warnings.push(format!(
            "Total required hours ({total_required}) exceed total available slots ({total_slots})"
        ));
    }

    let lab_rooms = inst.rooms.iter().filter(|r| r.kind.is_lab()).count() as u64;
    let lab_capacity = days * slots * lab_rooms;
    let lab_required: u64 = inst
        .courses
        .iter()
        .filter(|c| c.kind.needs_lab())
        .map(|c| c.hours as u64)
        .sum();
    if lab_required > lab_capacity {
        warnings.push(format!(
            "Lab hours required ({lab_required}) exceed lab capacity ({lab_capacity})"
        ));
    }

    let max_weekly = days * config.max_daily_sessions as u64;
    for (teacher, hours) in totals_in_order(inst.courses.iter().map(|c| (&c.teacher.0, c.hours))) {
        if hours > max_weekly {
            warnings.push(format!(
                "Teacher {teacher} exceeds weekly limit ({hours} > {max_weekly})"
            ));
        }
    }

    let max_batch_weekly = days * slots;
    for (batch, hours) in totals_in_order(inst.courses.iter().map(|c| (&c.batch.0, c.hours))) {
        if hours > max_batch_weekly {
            warnings.push(format!(
                "Batch {batch} exceeds weekly slot capacity ({hours} > {max_batch_weekly})"
            ));
        }
    }

    warnings
}

/// Sums hours per key, keeping keys in order of first appearance.
fn totals_in_order<'a>(items: impl Iterator<Item = (&'a String, u32)>) -> Vec<(&'a str, u64)> {
    let mut pos: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(&str, u64)> = Vec::new();
    for (key, hours) in items {
        let i = *pos.entry(key.as_str()).or_insert_with(|| {
            out.push((key.as_str(), 0));
            out.len() - 1
        });
        out[i].1 += hours as u64;
    }
    out
}

fn round_to(x: f64, places: i32) -> f64 {
    let k = 10f64.powi(places);
    (x * k).round() / k
}

fn balance_score(counts: &[f64]) -> f64 {
    round_to(100.0 - pstdev(counts) * 10.0, 2).clamp(0.0, 100.0)
}

pub fn metrics(p: &Problem<'_>, s: &Summaries, elapsed: Duration) -> Metrics {
    let capacity = p.capacity();
    let room_utilization_percent = if capacity == 0 {
        0.0
    } else {
        round_to(s.total_sessions as f64 / capacity as f64 * 100.0, 2)
    };

    let teacher_counts: Vec<f64> = s.teacher.values().map(|&n| n as f64).collect();
    let teacher_fairness_score = if teacher_counts.is_empty() {
        0.0
    } else {
        balance_score(&teacher_counts)
    };

    let day_counts: Vec<f64> = s.day.values().map(|&n| n as f64).collect();
    let day_balance_score = balance_score(&day_counts);

    let efficiency_score = round_to(
        room_utilization_percent * 0.4 + teacher_fairness_score * 0.3 + day_balance_score * 0.3,
        2,
    );

    Metrics {
        total_sessions: s.total_sessions,
        execution_time_seconds: round_to(elapsed.as_secs_f64(), 4),
        room_utilization_percent,
        teacher_fairness_score,
        day_balance_score,
        efficiency_score,
    }
}

/// Full post-run report over the final grid.
pub fn evaluate(p: &Problem<'_>, tt: &Timetable, elapsed: Duration) -> Report {
    let summaries = summarize(p, tt);
    let metrics = metrics(p, &summaries, elapsed);
    Report {
        coverage: coverage(p, tt),
        warnings: feasibility_warnings(p.instance, p.config),
        summaries,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::{course, instance, room};
    use types::{CourseKind, RoomKind};

    #[test]
    fn summaries_and_coverage_follow_the_cells() {
        let inst = instance(
            vec![
                course("CS101", "A", 2, "B1", CourseKind::Theory),
                course("CS102", "B", 1, "B2", CourseKind::Theory),
            ],
            vec![room("R1", RoomKind::Theory), room("R2", RoomKind::Theory)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        tt.assign(&p, 0, 0, 0, 0);
        tt.assign(&p, 1, 0, 0, 0);

        let s = summarize(&p, &tt);
        assert_eq!(s.total_sessions, 2);
        assert_eq!(s.teacher.get(&TeacherId::from("A")), Some(&2));
        assert_eq!(s.teacher.get(&TeacherId::from("B")), None);
        assert_eq!(s.room.get(&RoomId::from("R2")), Some(&0));
        assert_eq!(s.day.get(&DayOfWeek::Mon), Some(&1));
        assert_eq!(s.day.len(), 6);

        let cov = coverage(&p, &tt);
        assert_eq!(cov[&CourseCode::from("CS101")].status, CoverageStatus::Ok);
        assert_eq!(cov[&CourseCode::from("CS102")].scheduled, 0);
        assert_eq!(cov[&CourseCode::from("CS102")].status, CoverageStatus::Missing);
    }

    #[test]
    fn warnings_cover_every_capacity_check() {
        let inst = instance(
            vec![
                course("L1", "A", 4, "B1", CourseKind::Lab),
                course("T1", "A", 15, "B1", CourseKind::Theory),
                course("T2", "A", 15, "B1", CourseKind::Theory),
            ],
            vec![room("R1", RoomKind::Theory)],
        );
        let cfg = EngineConfig::default();
        let w = feasibility_warnings(&inst, &cfg);
        assert_eq!(
            w,
            vec![
                "Total required hours (34) exceed total available slots (30)".to_string(),
                "Lab hours required (4) exceed lab capacity (0)".to_string(),
                "Teacher A exceeds weekly limit (34 > 18)".to_string(),
                "Batch B1 exceeds weekly slot capacity (34 > 30)".to_string(),
            ]
        );
    }

    #[test]
    fn metrics_blend_utilization_fairness_and_balance() {
        let inst = instance(
            vec![course("CS101", "A", 6, "B1", CourseKind::Theory)],
            vec![room("R1", RoomKind::Theory)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        for d in 0..6 {
            tt.assign(&p, d, 0, 0, 0);
        }
        let m = metrics(&p, &summarize(&p, &tt), Duration::from_millis(12));
        assert_eq!(m.total_sessions, 6);
        assert_eq!(m.room_utilization_percent, 20.0);
        assert_eq!(m.teacher_fairness_score, 100.0);
        assert_eq!(m.day_balance_score, 100.0);
        assert_eq!(m.efficiency_score, 68.0);
        assert_eq!(m.execution_time_seconds, 0.012);
    }

    #[test]
    fn empty_grid_has_zero_fairness() {
        let inst = instance(vec![], vec![]);
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = Timetable::new(&p);
        let m = metrics(&p, &summarize(&p, &tt), Duration::ZERO);
        assert_eq!(m.room_utilization_percent, 0.0);
        assert_eq!(m.teacher_fairness_score, 0.0);
        assert_eq!(m.day_balance_score, 100.0);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let inst = instance(
            vec![course("CS101", "A", 3, "B1", CourseKind::Theory)],
            vec![room("R1", RoomKind::Theory)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        tt.assign(&p, 0, 0, 0, 0);
        tt.assign(&p, 3, 2, 0, 0);
        let a = evaluate(&p, &tt, Duration::from_millis(5));
        let b = evaluate(&p, &tt, Duration::from_millis(5));
        assert_eq!(a, b);
    }
}
