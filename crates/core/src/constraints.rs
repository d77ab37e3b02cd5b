//! Hard constraints.
//!
//! Both checks are pure: they read the grid and its counters and never
//! mutate them. A `false` answer just means the caller tries another cell.

use crate::grid::{Problem, Timetable};

/// Can course `ci` take cell `(day, slot, room)` given the current grid?
///
/// Checks run cheapest-first and stop at the first failure: teacher
/// unavailability, room occupancy, room type, teacher clash, batch clash,
/// daily teacher cap.
pub fn is_valid(
    p: &Problem<'_>,
    tt: &Timetable,
    day: usize,
    slot: usize,
    room: usize,
    ci: usize,
) -> bool {
    let teacher = p.teacher_of(ci);

    if p.is_blocked(teacher, day, slot) {
        return false;
    }
    if tt.cell(day, slot, room).is_some() {
        return false;
    }
    if p.course(ci).kind.needs_lab() != p.is_lab_room(room) {
        return false;
    }
    for r in 0..p.rooms() {
        if let Some(other) = tt.cell(day, slot, r) {
            if p.teacher_of(other) == teacher {
                return false;
            }
        }
    }
    if tt.batch_busy(day, slot, p.batch_of(ci)) {
        return false;
    }
    if tt.teacher_load(day, teacher) >= p.daily_cap() {
        return false;
    }
    true
}

/// Can a whole session of `ci` start at `(day, start, room)`?
///
/// The session spans `session_len` consecutive slots in the same room. Every
/// slot must pass [`is_valid`], and the teacher's day must have room for the
/// whole window, not just its first slot.
pub fn window_fits(
    p: &Problem<'_>,
    tt: &Timetable,
    day: usize,
    start: usize,
    room: usize,
    ci: usize,
) -> bool {
    let len = p.course(ci).kind.session_len();
    if start + len > p.slots() {
        return false;
    }
    if tt.teacher_load(day, p.teacher_of(ci)) + len as u32 > p.daily_cap() {
        return false;
    }
    (start..start + len).all(|s| is_valid(p, tt, day, s, room, ci))
}

/// Commits every slot of a session that passed [`window_fits`].
pub fn commit_window(
    p: &Problem<'_>,
    tt: &mut Timetable,
    day: usize,
    start: usize,
    room: usize,
    ci: usize,
) {
    for s in start..start + p.course(ci).kind.session_len() {
        tt.assign(p, day, s, room, ci);
    }
}

/// Full-grid scan for hard-constraint violations. Empty on a sound grid.
pub fn violations(p: &Problem<'_>, tt: &Timetable) -> Vec<String> {
    let mut out = Vec::new();
    for d in 0..p.days() {
        let day = p.day(d);
        let mut per_teacher = vec![0u32; p.teachers()];
        for s in 0..p.slots() {
            let mut teachers = vec![false; p.teachers()];
            let mut batches = vec![false; p.batches()];
            for r in 0..p.rooms() {
                let Some(ci) = tt.cell(d, s, r) else {
                    continue;
                };
                let c = p.course(ci);
                let (t, b) = (p.teacher_of(ci), p.batch_of(ci));
                let room = &p.instance.rooms[r].name;
                per_teacher[t] += 1;
                if std::mem::replace(&mut teachers[t], true) {
                    out.push(format!("teacher {} double-booked on {day} slot {}", c.teacher, s + 1));
                }
                if std::mem::replace(&mut batches[b], true) {
                    out.push(format!("batch {} double-booked on {day} slot {}", c.batch, s + 1));
                }
                if p.is_blocked(t, d, s) {
                    out.push(format!("teacher {} placed while unavailable on {day} slot {}", c.teacher, s + 1));
                }
                if c.kind.needs_lab() != p.is_lab_room(r) {
                    out.push(format!("course {} in incompatible room {room}", c.code));
                }
            }
        }
        for (t, &n) in per_teacher.iter().enumerate() {
            if n > p.daily_cap() {
                out.push(format!(
                    "teacher {} has {n} sessions on {day}, cap is {}",
                    p.teacher_id(t),
                    p.daily_cap()
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::{course, instance, room};
    use types::{CourseKind, DayOfWeek, EngineConfig, RoomKind, TeacherId, TimeCell};

    fn rooms() -> Vec<types::Room> {
        vec![room("R1", RoomKind::Theory), room("R2", RoomKind::Theory), room("LAB1", RoomKind::Lab)]
    }

    #[test]
    fn room_type_must_match_course_type() {
        let inst = instance(
            vec![
                course("CS101", "A", 1, "B1", CourseKind::Theory),
                course("CS102", "B", 2, "B2", CourseKind::Lab),
                course("CS103", "C", 2, "B3", CourseKind::Project),
            ],
            rooms(),
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = Timetable::new(&p);

        assert!(is_valid(&p, &tt, 0, 0, 0, 0));
        assert!(!is_valid(&p, &tt, 0, 0, 2, 0));
        assert!(!is_valid(&p, &tt, 0, 0, 0, 1));
        assert!(is_valid(&p, &tt, 0, 0, 2, 1));
        assert!(is_valid(&p, &tt, 0, 0, 2, 2));
    }

    #[test]
    fn clashes_are_rejected() {
        let inst = instance(
            vec![
                course("CS101", "A", 1, "B1", CourseKind::Theory),
                course("CS102", "A", 1, "B2", CourseKind::Theory),
                course("CS103", "C", 1, "B1", CourseKind::Theory),
                course("CS104", "D", 1, "B4", CourseKind::Theory),
            ],
            rooms(),
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        tt.assign(&p, 0, 0, 0, 0);

        // occupied room
        assert!(!is_valid(&p, &tt, 0, 0, 0, 3));
        // same teacher elsewhere
        assert!(!is_valid(&p, &tt, 0, 0, 1, 1));
        // same batch elsewhere
        assert!(!is_valid(&p, &tt, 0, 0, 1, 2));
        assert!(is_valid(&p, &tt, 0, 0, 1, 3));
        assert!(is_valid(&p, &tt, 0, 1, 1, 1));
    }

    #[test]
    fn unavailable_teacher_is_rejected() {
        let mut inst = instance(vec![course("CS101", "A", 1, "B1", CourseKind::Theory)], rooms());
        inst.unavailability.insert(
            TeacherId::from("A"),
            [TimeCell { day: DayOfWeek::Tue, slot: 3 }].into_iter().collect(),
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let tt = Timetable::new(&p);
        assert!(!is_valid(&p, &tt, 1, 2, 0, 0));
        assert!(is_valid(&p, &tt, 1, 1, 0, 0));
    }

    #[test]
    fn daily_cap_counts_the_whole_window() {
        let inst = instance(
            vec![
                course("CS101", "A", 2, "B1", CourseKind::Theory),
                course("CS102", "A", 2, "B2", CourseKind::Lab),
            ],
            rooms(),
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        tt.assign(&p, 0, 0, 0, 0);
        tt.assign(&p, 0, 1, 0, 0);

        // slot 3 alone is fine for the teacher, but a 2-slot lab would make 4
        assert!(is_valid(&p, &tt, 0, 2, 2, 1));
        assert!(!window_fits(&p, &tt, 0, 2, 2, 1));
        assert!(window_fits(&p, &tt, 1, 2, 2, 1));

        tt.assign(&p, 0, 2, 0, 0);
        assert!(!is_valid(&p, &tt, 0, 3, 0, 0));
    }

    #[test]
    fn window_must_fit_in_the_day() {
        let inst = instance(vec![course("CS102", "B", 2, "B2", CourseKind::Lab)], rooms());
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        assert!(window_fits(&p, &tt, 0, 3, 2, 0));
        assert!(!window_fits(&p, &tt, 0, 4, 2, 0));

        commit_window(&p, &mut tt, 0, 3, 2, 0);
        assert_eq!(tt.cell(0, 3, 2), Some(0));
        assert_eq!(tt.cell(0, 4, 2), Some(0));
        assert_eq!(tt.teacher_load(0, 0), 2);
        assert!(violations(&p, &tt).is_empty());
    }

    #[test]
    fn audit_reports_forced_clashes() {
        let inst = instance(
            vec![
                course("CS101", "A", 1, "B1", CourseKind::Theory),
                course("CS102", "A", 1, "B1", CourseKind::Theory),
            ],
            rooms(),
        );
        let cfg = EngineConfig::default();
        let p = Problem::new(&inst, &cfg).unwrap();
        let mut tt = Timetable::new(&p);
        tt.assign(&p, 0, 0, 0, 0);
        tt.assign(&p, 0, 0, 2, 1);
        let v = violations(&p, &tt);
        assert_eq!(v.len(), 3);
        assert!(v[0].starts_with("teacher A double-booked on Mon slot 1"));
        assert!(v[1].starts_with("batch B1 double-booked"));
        assert!(v[2].contains("incompatible room LAB1"));
    }
}
