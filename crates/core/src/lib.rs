pub mod analysis;
pub mod constraints;
pub mod export;
pub mod grid;
pub mod scoring;

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

pub use types::{
    Course, DayOfWeek, EngineConfig, GenerateRequest, GenerateResult, Instance, Mode, Room,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid instance: {0}")]
    Msg(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("engine config has no days")]
    NoDays,
    #[error("engine config lists day {0} twice")]
    DuplicateDay(DayOfWeek),
    #[error("engine config has zero slots per day")]
    NoSlots,
    #[error("engine config allows zero sessions per teacher per day")]
    NoDailyCapacity,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Input checks the calling layer runs before handing data to the engine.
///
/// The engine itself trusts its input; this is where malformed uploads are
/// turned away.
pub fn validate(inst: &Instance, config: &EngineConfig) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    fn chk_unique<'a>(name: &str, ids: impl Iterator<Item = &'a str>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                errors.push(format!("duplicate {name}: {id}"));
            }
        }
    }
    chk_unique(
        "course code",
        inst.courses.iter().map(|c| c.code.0.as_str()),
        &mut errors,
    );
    chk_unique(
        "room name",
        inst.rooms.iter().map(|r| r.name.0.as_str()),
        &mut errors,
    );

    for r in &inst.rooms {
        if r.name.0.trim().is_empty() {
            errors.push("room has empty name".into());
        }
    }

    for c in &inst.courses {
        if c.code.0.trim().is_empty() {
            errors.push("course has empty code".into());
        }
        if c.teacher.0.trim().is_empty() {
            errors.push(format!("course {} has empty teacher", c.code.0));
        }
        if c.batch.0.trim().is_empty() {
            errors.push(format!("course {} has empty batch", c.code.0));
        }
    }

    let teachers: HashSet<_> = inst.courses.iter().map(|c| c.teacher.0.as_str()).collect();
    let days: HashSet<_> = config.days.iter().collect();
    for (teacher, cells) in &inst.unavailability {
        if !teachers.contains(teacher.0.as_str()) {
            errors.push(format!(
                "unavailability references unknown teacher {}",
                teacher.0
            ));
        }
        for cell in cells {
            if !days.contains(&cell.day) {
                errors.push(format!(
                    "teacher {} unavailable on {} which is not a teaching day",
                    teacher.0, cell.day
                ));
            }
            if cell.slot == 0 || cell.slot > config.slots_per_day {
                errors.push(format!(
                    "teacher {} unavailable in slot {} outside 1..={}",
                    teacher.0, cell.slot, config.slots_per_day
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

#[async_trait]
pub trait Engine: Send + Sync + 'static {
    async fn generate(&self, req: GenerateRequest) -> anyhow::Result<GenerateResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::{course, instance, room};
    use types::{CourseKind, RoomKind, TeacherId, TimeCell};

    #[test]
    fn clean_instance_passes() {
        let inst = instance(
            vec![course("CS101", "A", 0, "B1", CourseKind::Theory)],
            vec![room("R1", RoomKind::Theory)],
        );
        assert!(validate(&inst, &EngineConfig::default()).is_ok());
    }

    #[test]
    fn problems_are_collected() {
        let mut inst = instance(
            vec![
                course("CS101", "A", 2, "B1", CourseKind::Theory),
                course("CS101", "", 1, "B1", CourseKind::Lab),
            ],
            vec![room("R1", RoomKind::Theory), room("R1", RoomKind::Lab)],
        );
        inst.unavailability.insert(
            TeacherId::from("Z"),
            [
                TimeCell { day: DayOfWeek::Sun, slot: 7 },
            ]
            .into_iter()
            .collect(),
        );
        let Err(ValidationError::Msg(msg)) = validate(&inst, &EngineConfig::default()) else {
            panic!("expected validation failure");
        };
        assert!(msg.contains("duplicate course code: CS101"));
        assert!(msg.contains("duplicate room name: R1"));
        assert!(msg.contains("course CS101 has empty teacher"));
        assert!(msg.contains("unknown teacher Z"));
        assert!(msg.contains("on Sun"));
        assert!(msg.contains("slot 7 outside 1..=5"));
    }
}
