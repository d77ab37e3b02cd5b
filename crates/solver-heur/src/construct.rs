use sched_core::constraints::{commit_window, window_fits};
use sched_core::grid::{Problem, Timetable};
use std::cmp::Reverse;
use tracing::debug;

/// Deterministic first-fit placement.
///
/// Courses go in descending order of required hours (stable for ties). Each
/// session takes the first valid `(day, slot, room)` window in grid order and
/// the scan restarts from the top after every placement. A course whose
/// hours find no window in a full pass keeps its remaining hours unplaced.
pub fn construct(p: &Problem<'_>) -> Timetable {
    let mut tt = Timetable::new(p);

    let mut order: Vec<usize> = (0..p.instance.courses.len()).collect();
    order.sort_by_key(|&ci| Reverse(p.course(ci).hours));

    for ci in order {
        let course = p.course(ci);
        let len = course.kind.session_len() as i64;
        let mut remaining = course.hours as i64;

        while remaining > 0 {
            let Some((d, s, r)) = first_fit(p, &tt, ci) else {
                debug!(course = %course.code, remaining, "no valid window left");
                break;
            };
            commit_window(p, &mut tt, d, s, r, ci);
            remaining -= len;
        }
    }
    tt
}

fn first_fit(p: &Problem<'_>, tt: &Timetable, ci: usize) -> Option<(usize, usize, usize)> {
    let len = p.course(ci).kind.session_len();
    for d in 0..p.days() {
        for s in 0..p.slots() {
            if s + len > p.slots() {
                continue;
            }
            for r in 0..p.rooms() {
                if window_fits(p, tt, d, s, r, ci) {
                    return Some((d, s, r));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::constraints::violations;
    use types::{
        BatchId, Course, CourseCode, CourseKind, EngineConfig, Instance, Room, RoomId, RoomKind,
        TeacherId,
    };

    fn course(code: &str, teacher: &str, hours: u32, batch: &str, kind: CourseKind) -> Course {
        Course {
            code: CourseCode::from(code),
            teacher: TeacherId::from(teacher),
            hours,
            batch: BatchId::from(batch),
            kind,
        }
    }

    fn inst(courses: Vec<Course>, rooms: &[(&str, RoomKind)]) -> Instance {
        Instance {
            courses,
            rooms: rooms
                .iter()
                .map(|(n, k)| Room {
                    name: RoomId::from(*n),
                    kind: *k,
                })
                .collect(),
            unavailability: Default::default(),
            weights: Default::default(),
        }
    }

    #[test]
    fn first_fit_fills_from_the_top() {
        let inst = inst(
            vec![course("CS101", "A", 2, "B1", CourseKind::Theory)],
            &[("R1", RoomKind::Theory), ("LAB1", RoomKind::Lab)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = construct(&p);
        // batch clash pushes the second hour to slot 2, not room 2
        assert_eq!(tt.occupied().collect::<Vec<_>>(), vec![(0, 0, 0, 0), (0, 1, 0, 0)]);
    }

    #[test]
    fn highest_demand_goes_first() {
        let inst = inst(
            vec![
                course("SMALL", "A", 1, "B1", CourseKind::Theory),
                course("BIG", "B", 3, "B2", CourseKind::Theory),
            ],
            &[("R1", RoomKind::Theory)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = construct(&p);
        assert_eq!(tt.cell(0, 0, 0), Some(1));
        assert_eq!(tt.cell(0, 1, 0), Some(1));
        assert_eq!(tt.cell(0, 2, 0), Some(1));
        assert_eq!(tt.cell(0, 3, 0), Some(0));
    }

    #[test]
    fn teacher_cap_spills_into_next_day() {
        let inst = inst(
            vec![course("CS101", "A", 5, "B1", CourseKind::Theory)],
            &[("R1", RoomKind::Theory)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = construct(&p);
        assert_eq!(tt.day_loads(), &[3, 2, 0, 0, 0, 0]);
        assert!(violations(&p, &tt).is_empty());
    }

    #[test]
    fn odd_lab_hours_round_up_to_whole_sessions() {
        let inst = inst(
            vec![course("LAB", "A", 3, "B1", CourseKind::Lab)],
            &[("LAB1", RoomKind::Lab)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = construct(&p);
        assert_eq!(tt.total_sessions(), 4);
        // a 2-slot session never crosses the cap: slots 1-2 on Mon, then Tue
        assert_eq!(tt.day_loads(), &[2, 2, 0, 0, 0, 0]);
        assert!(violations(&p, &tt).is_empty());
    }

    #[test]
    fn unplaceable_hours_are_abandoned() {
        let cfg = EngineConfig {
            days: vec![types::DayOfWeek::Mon],
            slots_per_day: 2,
            ..Default::default()
        };
        let inst = inst(
            vec![course("CS101", "A", 4, "B1", CourseKind::Theory)],
            &[("R1", RoomKind::Theory), ("R2", RoomKind::Theory)],
        );
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = construct(&p);
        assert_eq!(tt.total_sessions(), 2);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let inst = inst(
            vec![
                course("CS101", "A", 3, "B1", CourseKind::Theory),
                course("CS102", "A", 2, "B2", CourseKind::Lab),
                course("CS103", "B", 4, "B1", CourseKind::Theory),
                course("CS104", "C", 2, "B2", CourseKind::Project),
            ],
            &[("R1", RoomKind::Theory), ("R2", RoomKind::Theory), ("LAB1", RoomKind::Lab)],
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        assert_eq!(construct(&p), construct(&p));
    }
}
