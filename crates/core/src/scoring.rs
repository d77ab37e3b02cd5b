use crate::grid::{Problem, Timetable};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scores {
    pub total_sessions: u32,
    pub day_imbalance: f64,
    pub teacher_imbalance: f64,
    pub room_imbalance: f64,
    pub objective: f64,
}

/// Population standard deviation; zero for fewer than two samples.
pub fn pstdev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    var.sqrt()
}

/// Fitness of a (possibly partial) grid. Higher is better.
///
/// Raw session count minus three weighted imbalance terms: sessions per day,
/// sessions per teacher per working day, and rooms in use per slot.
pub fn compute_scores(p: &Problem<'_>, tt: &Timetable) -> Scores {
    let day_loads: Vec<f64> = tt.day_loads().iter().map(|&n| n as f64).collect();
    let total_sessions = tt.total_sessions();

    let teacher_loads: Vec<f64> = tt.teacher_day_loads().map(|n| n as f64).collect();

    let mut room_usage: Vec<f64> = Vec::with_capacity(p.days() * p.slots());
    for d in 0..p.days() {
        for s in 0..p.slots() {
            room_usage.push(tt.rooms_used(d, s) as f64);
        }
    }

    let day_imbalance = pstdev(&day_loads);
    let teacher_imbalance = pstdev(&teacher_loads);
    let room_imbalance = pstdev(&room_usage);

    let w = &p.instance.weights;
    let objective = total_sessions as f64
        - w.day_balance as f64 * day_imbalance
        - w.teacher_balance as f64 * teacher_imbalance
        - w.room_balance as f64 * room_imbalance;

    Scores {
        total_sessions,
        day_imbalance,
        teacher_imbalance,
        room_imbalance,
        objective,
    }
}

pub fn score(p: &Problem<'_>, tt: &Timetable) -> f64 {
    compute_scores(p, tt).objective
}
