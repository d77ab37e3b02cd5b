pub mod construct;
pub mod optimize;

use async_trait::async_trait;
use rand::Rng;
use sched_core::constraints::violations;
use sched_core::grid::{Problem, Timetable};
use sched_core::{analysis, scoring, Engine, EngineError};
use std::time::Instant;
use tracing::{info, warn};
use types::{EngineConfig, GenerateRequest, GenerateResult, Instance, Mode};

pub use construct::construct;
pub use optimize::optimize;

pub struct HeurEngine;
impl HeurEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeurEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for HeurEngine {
    async fn generate(&self, req: GenerateRequest) -> anyhow::Result<GenerateResult> {
        Ok(generate(&req.instance, req.mode, &req.config)?)
    }
}

/// Grid produced by one mode plus what the optimizer saw along the way.
#[derive(Clone, Debug)]
pub struct Run {
    pub timetable: Timetable,
    pub trial_scores: Vec<f64>,
    pub best_trial: Option<usize>,
    pub optimizer_chosen: bool,
}

pub fn run_mode(p: &Problem<'_>, mode: Mode, seed: u64) -> Run {
    match mode {
        Mode::Csp => Run {
            timetable: construct(p),
            trial_scores: Vec::new(),
            best_trial: None,
            optimizer_chosen: false,
        },
        Mode::Optimizer => {
            let out = optimize(p, seed);
            let best_trial = out.best.as_ref().map(|t| t.index);
            let optimizer_chosen = out.best.is_some();
            Run {
                timetable: out
                    .best
                    .map(|t| t.timetable)
                    .unwrap_or_else(|| Timetable::new(p)),
                trial_scores: out.trial_scores,
                best_trial,
                optimizer_chosen,
            }
        }
        Mode::Hybrid => {
            let baseline = construct(p);
            let out = optimize(p, seed);
            let best_trial = out.best.as_ref().map(|t| t.index);
            match out.best {
                Some(t) => Run {
                    timetable: t.timetable,
                    trial_scores: out.trial_scores,
                    best_trial,
                    optimizer_chosen: true,
                },
                None => Run {
                    timetable: baseline,
                    trial_scores: out.trial_scores,
                    best_trial,
                    optimizer_chosen: false,
                },
            }
        }
    }
}

/// Runs one mode and always analyzes the grid it returns.
///
/// Infeasible input never fails here; it shows up as `MISSING` coverage and
/// feasibility warnings. Only a degenerate week shape is an error.
pub fn generate(
    inst: &Instance,
    mode: Mode,
    config: &EngineConfig,
) -> Result<GenerateResult, EngineError> {
    let p = Problem::new(inst, config)?;
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(
        %mode,
        courses = inst.courses.len(),
        rooms = inst.rooms.len(),
        seed,
        "generating timetable"
    );

    let started = Instant::now();
    let run = run_mode(&p, mode, seed);
    let elapsed = started.elapsed();

    let report = analysis::evaluate(&p, &run.timetable, elapsed);
    let scores = scoring::compute_scores(&p, &run.timetable);
    let broken = violations(&p, &run.timetable);
    if !broken.is_empty() {
        warn!(count = broken.len(), first = %broken[0], "final grid violates hard constraints");
    }
    let missing = report
        .coverage
        .values()
        .filter(|c| c.status == types::CoverageStatus::Missing)
        .count();

    info!(
        %mode,
        sessions = report.summaries.total_sessions,
        score = scores.objective,
        missing,
        warnings = report.warnings.len(),
        "timetable generated"
    );

    Ok(GenerateResult {
        mode,
        placements: run.timetable.placements(&p),
        metrics: report.metrics,
        teacher_summary: report.summaries.teacher,
        room_summary: report.summaries.room,
        day_summary: report.summaries.day,
        coverage: report.coverage,
        warnings: report.warnings,
        score: scores.objective,
        stats: serde_json::json!({
            "method": mode.to_string(),
            "seed": seed,
            "trial_scores": run.trial_scores,
            "best_trial": run.best_trial,
            "optimizer_chosen": run.optimizer_chosen,
            "day_imbalance": scores.day_imbalance,
            "teacher_imbalance": scores.teacher_imbalance,
            "room_imbalance": scores.room_imbalance,
            "violations": broken,
        }),
    })
}
