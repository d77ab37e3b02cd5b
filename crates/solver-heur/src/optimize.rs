use rand::{seq::SliceRandom, Rng};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use sched_core::constraints::{commit_window, window_fits};
use sched_core::grid::{Problem, Timetable};
use sched_core::scoring;
use tracing::debug;

/// Best score before any trial has run; the first trial always beats it.
const INITIAL_BEST: f64 = -999_999.0;

#[derive(Clone, Debug)]
pub struct Trial {
    pub index: usize,
    pub score: f64,
    pub timetable: Timetable,
}

#[derive(Clone, Debug)]
pub struct Outcome {
    pub best: Option<Trial>,
    pub trial_scores: Vec<f64>,
}

fn trial_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Independent randomized restarts; keeps the highest-scoring grid.
///
/// Every trial draws from its own generator, so running them on the rayon
/// pool gives the same outcome as running them in sequence. Ties keep the
/// earliest trial.
pub fn optimize(p: &Problem<'_>, seed: u64) -> Outcome {
    let n = p.config.trials;
    let trials: Vec<Trial> = if p.config.parallel_trials {
        (0..n)
            .into_par_iter()
            .map(|i| run_trial(p, trial_seed(seed, i), i))
            .collect()
    } else {
        (0..n).map(|i| run_trial(p, trial_seed(seed, i), i)).collect()
    };

    let trial_scores: Vec<f64> = trials.iter().map(|t| t.score).collect();
    let mut best_score = INITIAL_BEST;
    let mut best: Option<Trial> = None;
    for t in trials {
        if t.score > best_score {
            best_score = t.score;
            best = Some(t);
        }
    }

    Outcome { best, trial_scores }
}

fn run_trial(p: &Problem<'_>, seed: u64, index: usize) -> Trial {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tt = Timetable::new(p);
    let budget = p.config.attempts_per_course;

    let mut order: Vec<usize> = (0..p.instance.courses.len()).collect();
    order.shuffle(&mut rng);

    for ci in order {
        let course = p.course(ci);
        let len = course.kind.session_len();
        let mut remaining = course.hours as i64;
        let mut attempts = 0u32;

        while remaining > 0 && attempts < budget {
            let d = rng.gen_range(0..p.days());
            let s = rng.gen_range(0..p.slots());
            if s + len > p.slots() || p.rooms() == 0 {
                attempts += 1;
                continue;
            }
            let r = rng.gen_range(0..p.rooms());
            if window_fits(p, &tt, d, s, r, ci) {
                commit_window(p, &mut tt, d, s, r, ci);
                remaining -= len as i64;
            } else {
                attempts += 1;
            }
        }
    }

    let score = scoring::score(p, &tt);
    debug!(trial = index, score, sessions = tt.total_sessions(), "trial finished");
    Trial {
        index,
        score,
        timetable: tt,
    }
}
