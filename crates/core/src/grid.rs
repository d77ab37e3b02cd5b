//! Dense timetable grid and the load counters derived from it.
//!
//! Every identifier in the input is mapped to a small index once, in
//! [`Problem::new`]. The grid itself is a flat `day × slot × room` array of
//! course indices, so the inner validity checks never touch a hash map.
//! Slots are 0-based here and 1-based on the wire.

use std::collections::{HashMap, HashSet};

use types::{Course, DayOfWeek, EngineConfig, Instance, Placement, TeacherId};

use crate::ConfigError;

/// Read-only view of one run's input with index side tables.
#[derive(Debug)]
pub struct Problem<'a> {
    pub instance: &'a Instance,
    pub config: &'a EngineConfig,
    days: usize,
    slots: usize,
    rooms: usize,
    teachers: Vec<&'a TeacherId>,
    batches: usize,
    course_teacher: Vec<usize>,
    course_batch: Vec<usize>,
    room_is_lab: Vec<bool>,
    blocked: Vec<bool>,
}

impl<'a> Problem<'a> {
    pub fn new(instance: &'a Instance, config: &'a EngineConfig) -> Result<Self, ConfigError> {
        if config.days.is_empty() {
            return Err(ConfigError::NoDays);
        }
        let mut seen = HashSet::new();
        for d in &config.days {
            if !seen.insert(*d) {
                return Err(ConfigError::DuplicateDay(*d));
            }
        }
        if config.slots_per_day == 0 {
            return Err(ConfigError::NoSlots);
        }
        if config.max_daily_sessions == 0 {
            return Err(ConfigError::NoDailyCapacity);
        }

        let days = config.days.len();
        let slots = config.slots_per_day as usize;

        let mut teacher_index: HashMap<&str, usize> = HashMap::new();
        let mut teachers: Vec<&TeacherId> = Vec::new();
        let mut batch_index: HashMap<&str, usize> = HashMap::new();
        let mut course_teacher = Vec::with_capacity(instance.courses.len());
        let mut course_batch = Vec::with_capacity(instance.courses.len());
        for c in &instance.courses {
            let t = *teacher_index.entry(c.teacher.0.as_str()).or_insert_with(|| {
                teachers.push(&c.teacher);
                teachers.len() - 1
            });
            let next = batch_index.len();
            let b = *batch_index.entry(c.batch.0.as_str()).or_insert(next);
            course_teacher.push(t);
            course_batch.push(b);
        }

        let day_pos: HashMap<DayOfWeek, usize> =
            config.days.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let mut blocked = vec![false; teachers.len() * days * slots];
        for (teacher, cells) in &instance.unavailability {
            // Teachers with no course can never be placed, so nothing to block.
            let Some(&t) = teacher_index.get(teacher.0.as_str()) else {
                continue;
            };
            for cell in cells {
                let Some(&d) = day_pos.get(&cell.day) else {
                    continue;
                };
                if cell.slot == 0 || cell.slot as usize > slots {
                    continue;
                }
                blocked[(t * days + d) * slots + cell.slot as usize - 1] = true;
            }
        }

        Ok(Self {
            instance,
            config,
            days,
            slots,
            rooms: instance.rooms.len(),
            teachers,
            batches: batch_index.len(),
            course_teacher,
            course_batch,
            room_is_lab: instance.rooms.iter().map(|r| r.kind.is_lab()).collect(),
            blocked,
        })
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn rooms(&self) -> usize {
        self.rooms
    }

    pub fn teachers(&self) -> usize {
        self.teachers.len()
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn day(&self, d: usize) -> DayOfWeek {
        self.config.days[d]
    }

    pub fn course(&self, ci: usize) -> &'a Course {
        &self.instance.courses[ci]
    }

    pub fn teacher_of(&self, ci: usize) -> usize {
        self.course_teacher[ci]
    }

    pub fn batch_of(&self, ci: usize) -> usize {
        self.course_batch[ci]
    }

    pub fn teacher_id(&self, t: usize) -> &'a TeacherId {
        self.teachers[t]
    }

    pub fn is_lab_room(&self, r: usize) -> bool {
        self.room_is_lab[r]
    }

    pub fn is_blocked(&self, t: usize, day: usize, slot: usize) -> bool {
        self.blocked[(t * self.days + day) * self.slots + slot]
    }

    pub fn daily_cap(&self) -> u32 {
        self.config.max_daily_sessions
    }

    /// Total (day, slot, room) cells in the week.
    pub fn capacity(&self) -> usize {
        self.days * self.slots * self.rooms
    }
}

/// Grid cells plus the counters the validator reads.
///
/// Cloning a `Timetable` is the deep copy the optimizer keeps: cells and
/// counters always travel together.
#[derive(Clone, Debug, PartialEq)]
pub struct Timetable {
    days: usize,
    slots: usize,
    rooms: usize,
    teachers: usize,
    batches: usize,
    cells: Vec<Option<usize>>,
    teacher_load: Vec<u32>,
    batch_busy: Vec<bool>,
    day_load: Vec<u32>,
}

impl Timetable {
    pub fn new(p: &Problem<'_>) -> Self {
        let (days, slots, rooms) = (p.days(), p.slots(), p.rooms());
        Self {
            days,
            slots,
            rooms,
            teachers: p.teachers(),
            batches: p.batches(),
            cells: vec![None; days * slots * rooms],
            teacher_load: vec![0; days * p.teachers()],
            batch_busy: vec![false; days * slots * p.batches()],
            day_load: vec![0; days],
        }
    }

    pub fn reset(&mut self) {
        self.cells.fill(None);
        self.teacher_load.fill(0);
        self.batch_busy.fill(false);
        self.day_load.fill(0);
    }

    fn idx(&self, day: usize, slot: usize, room: usize) -> usize {
        (day * self.slots + slot) * self.rooms + room
    }

    pub fn cell(&self, day: usize, slot: usize, room: usize) -> Option<usize> {
        self.cells[self.idx(day, slot, room)]
    }

    pub fn teacher_load(&self, day: usize, teacher: usize) -> u32 {
        self.teacher_load[day * self.teachers + teacher]
    }

    pub fn batch_busy(&self, day: usize, slot: usize, batch: usize) -> bool {
        self.batch_busy[(day * self.slots + slot) * self.batches + batch]
    }

    pub fn day_loads(&self) -> &[u32] {
        &self.day_load
    }

    /// Per-day per-teacher counts, skipping teachers idle that day.
    pub fn teacher_day_loads(&self) -> impl Iterator<Item = u32> + '_ {
        self.teacher_load.iter().copied().filter(|&n| n > 0)
    }

    pub fn rooms_used(&self, day: usize, slot: usize) -> usize {
        let start = self.idx(day, slot, 0);
        self.cells[start..start + self.rooms]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }

    pub fn total_sessions(&self) -> u32 {
        self.day_load.iter().sum()
    }

    /// Occupied cells as `(day, slot, room, course)` in grid order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, usize, usize)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            let ci = (*c)?;
            let room = i % self.rooms;
            let slot = (i / self.rooms) % self.slots;
            let day = i / (self.rooms * self.slots);
            Some((day, slot, room, ci))
        })
    }

    /// Commits one slot of a session. The caller has already checked
    /// [`crate::constraints::is_valid`] for this cell.
    pub fn assign(&mut self, p: &Problem<'_>, day: usize, slot: usize, room: usize, ci: usize) {
        let i = self.idx(day, slot, room);
        self.cells[i] = Some(ci);
        self.teacher_load[day * self.teachers + p.teacher_of(ci)] += 1;
        self.batch_busy[(day * self.slots + slot) * self.batches + p.batch_of(ci)] = true;
        self.day_load[day] += 1;
    }

    /// Rebuilds a grid from its wire form. Entries naming an unknown course,
    /// room, day or slot are skipped.
    pub fn from_placements(p: &Problem<'_>, placements: &[Placement]) -> Self {
        let course_pos: HashMap<&str, usize> = p
            .instance
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.0.as_str(), i))
            .collect();
        let room_pos: HashMap<&str, usize> = p
            .instance
            .rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.0.as_str(), i))
            .collect();
        let day_pos: HashMap<DayOfWeek, usize> =
            p.config.days.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut tt = Self::new(p);
        for pl in placements {
            let (Some(&ci), Some(&r), Some(&d)) = (
                course_pos.get(pl.course.0.as_str()),
                room_pos.get(pl.room.0.as_str()),
                day_pos.get(&pl.day),
            ) else {
                continue;
            };
            if pl.slot == 0 || pl.slot as usize > p.slots() {
                continue;
            }
            tt.assign(p, d, pl.slot as usize - 1, r, ci);
        }
        tt
    }

    pub fn placements(&self, p: &Problem<'_>) -> Vec<Placement> {
        self.occupied()
            .map(|(day, slot, room, ci)| {
                let c = p.course(ci);
                Placement {
                    day: p.day(day),
                    slot: slot as u8 + 1,
                    room: p.instance.rooms[room].name.clone(),
                    course: c.code.clone(),
                    teacher: c.teacher.clone(),
                    batch: c.batch.clone(),
                }
            })
            .collect()
    }
}
