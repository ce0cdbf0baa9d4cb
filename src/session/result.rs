use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::content::{Level, WordId};
use crate::session::pool::Scope;
use crate::session::state::SessionMode;

/// Per-level score delta accumulated during one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelDelta {
    pub correct: u32,
    pub incorrect: u32,
}

/// Final tally of a finished session; the statistics aggregator's only
/// write input.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub mode: SessionMode,
    pub scope: Scope,
    pub correct: u32,
    pub incorrect: u32,
    pub total_questions: usize,
    pub accuracy: f64,
    pub elapsed_secs: f64,
    pub level_breakdown: BTreeMap<Level, LevelDelta>,
    pub learned: BTreeSet<WordId>,
    pub timestamp: DateTime<Utc>,
}

/// Percentage accurate to one decimal; 0 when there are no samples.
pub(crate) fn accuracy_pct(correct: u32, incorrect: u32) -> f64 {
    let total = correct + incorrect;
    if total == 0 {
        return 0.0;
    }
    (correct as f64 / total as f64 * 1000.0).round() / 10.0
}
