use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone,
            Debug,
            Serialize,
            Deserialize,
            ToSchema,
            JsonSchema,
            Eq,
            PartialEq,
            Hash,
            PartialOrd,
            Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(TeacherId);
id_newtype!(BatchId);
id_newtype!(RoomId);
id_newtype!(CourseCode);

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    #[serde(alias = "Mon")]
    Mon,
    #[serde(alias = "Tue")]
    Tue,
    #[serde(alias = "Wed")]
    Wed,
    #[serde(alias = "Thu")]
    Thu,
    #[serde(alias = "Fri")]
    Fri,
    #[serde(alias = "Sat")]
    Sat,
    #[serde(alias = "Sun")]
    Sun,
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayOfWeek::Mon => "Mon",
            DayOfWeek::Tue => "Tue",
            DayOfWeek::Wed => "Wed",
            DayOfWeek::Thu => "Thu",
            DayOfWeek::Fri => "Fri",
            DayOfWeek::Sat => "Sat",
            DayOfWeek::Sun => "Sun",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CourseKind {
    #[default]
    Theory,
    Lab,
    Project,
}

impl CourseKind {
    /// Lab and project sessions run in lab rooms only.
    pub fn needs_lab(self) -> bool {
        matches!(self, CourseKind::Lab | CourseKind::Project)
    }

    /// Consecutive slots one session occupies.
    pub fn session_len(self) -> usize {
        if self.needs_lab() {
            2
        } else {
            1
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Lab,
    #[default]
    Theory,
    #[serde(other)]
    Other,
}

impl RoomKind {
    pub fn is_lab(self) -> bool {
        self == RoomKind::Lab
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Course {
    pub code: CourseCode,
    pub teacher: TeacherId,
    pub hours: u32,
    pub batch: BatchId,
    #[serde(rename = "type", default)]
    pub kind: CourseKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Room {
    pub name: RoomId,
    #[serde(rename = "type", default)]
    pub kind: RoomKind,
}

/// One (day, slot) pair; slots are 1-based.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct TimeCell {
    pub day: DayOfWeek,
    pub slot: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default)]
pub struct BalanceWeights {
    #[serde(default)]
    pub day_balance: u32,
    #[serde(default)]
    pub teacher_balance: u32,
    #[serde(default)]
    pub room_balance: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Instance {
    pub courses: Vec<Course>,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub unavailability: HashMap<TeacherId, HashSet<TimeCell>>,
    #[serde(default)]
    pub weights: BalanceWeights,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Csp,
    Optimizer,
    #[default]
    Hybrid,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Csp => "csp",
            Mode::Optimizer => "optimizer",
            Mode::Hybrid => "hybrid",
        })
    }
}

fn default_days() -> Vec<DayOfWeek> {
    vec![
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
    ]
}
fn default_slots_per_day() -> u8 {
    5
}
fn default_max_daily_sessions() -> u32 {
    3
}
fn default_trials() -> usize {
    5
}
fn default_attempts_per_course() -> u32 {
    60
}

/// Week shape and search budgets for one engine run.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct EngineConfig {
    #[serde(default = "default_days")]
    pub days: Vec<DayOfWeek>,
    #[serde(default = "default_slots_per_day")]
    pub slots_per_day: u8,
    /// Hard cap on sessions per teacher per day.
    #[serde(default = "default_max_daily_sessions")]
    pub max_daily_sessions: u32,
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Failed placement attempts a course may spend within one trial.
    #[serde(default = "default_attempts_per_course")]
    pub attempts_per_course: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub parallel_trials: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            slots_per_day: default_slots_per_day(),
            max_daily_sessions: default_max_daily_sessions(),
            trials: default_trials(),
            attempts_per_course: default_attempts_per_course(),
            seed: None,
            parallel_trials: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateRequest {
    pub instance: Instance,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub config: EngineConfig,
}

/// One occupied grid cell.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct Placement {
    pub day: DayOfWeek,
    pub slot: u8,
    pub room: RoomId,
    pub course: CourseCode,
    pub teacher: TeacherId,
    pub batch: BatchId,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, PartialEq)]
pub struct Metrics {
    pub total_sessions: u32,
    pub execution_time_seconds: f64,
    pub room_utilization_percent: f64,
    pub teacher_fairness_score: f64,
    pub day_balance_score: f64,
    pub efficiency_score: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub enum CoverageStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "MISSING")]
    Missing,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct CoverageEntry {
    pub required: u32,
    pub scheduled: u32,
    pub batch: BatchId,
    pub status: CoverageStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateResult {
    pub mode: Mode,
    pub placements: Vec<Placement>,
    pub metrics: Metrics,
    pub teacher_summary: BTreeMap<TeacherId, u32>,
    pub room_summary: BTreeMap<RoomId, u32>,
    pub day_summary: BTreeMap<DayOfWeek, u32>,
    pub coverage: BTreeMap<CourseCode, CoverageEntry>,
    pub warnings: Vec<String>,
    pub score: f64,
    pub stats: serde_json::Value,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    /// `room: code` cells joined by ` | `.
    #[default]
    Spreadsheet,
    /// `room:code` cells joined by newlines.
    Document,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
pub struct DayRow {
    pub day: DayOfWeek,
    pub cells: Vec<String>,
}
