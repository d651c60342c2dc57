//! Group violations by the race-lane they describe
//!
//! Every violation for the same (event, heat, lane) folds into one
//! [`LaneResult`]. The first violation seen supplies the entry snapshot; later
//! ones only add findings, in arrival order.

use crate::checkers::{Reason, Violation};
use crate::model::Participation;
use std::collections::HashMap;

/// One rule hit on a lane
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub check_name: String,
    pub reason: Reason,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneResult {
    entry: Participation,
    findings: Vec<Finding>,
}

impl LaneResult {
    fn new(entry: Participation) -> Self {
        Self {
            entry,
            findings: Vec::new(),
        }
    }

    fn accumulate(&mut self, check_name: String, reason: Reason, color: String) {
        self.findings.push(Finding {
            check_name,
            reason,
            color,
        });
    }

    pub fn entry(&self) -> &Participation {
        &self.entry
    }

    pub fn event_no(&self) -> i64 {
        self.entry.event_no()
    }

    pub fn heat(&self) -> i64 {
        self.entry.heat()
    }

    pub fn lane(&self) -> i64 {
        self.entry.lane()
    }

    pub fn event_name(&self) -> &str {
        self.entry.event_name()
    }

    pub fn display_name(&self) -> &str {
        self.entry.display_name()
    }

    pub fn team_abbr(&self) -> &str {
        self.entry.team_abbr()
    }

    pub fn finish_time(&self) -> Option<f64> {
        self.entry.finish_time()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn num_findings(&self) -> usize {
        self.findings.len()
    }

    /// Bulleted `name: reason` lines for text output
    pub fn checks_as_str(&self) -> String {
        self.findings
            .iter()
            .map(|f| format!("    * {}: {}", f.check_name, f.reason))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fold violations into lane results, in order of each lane's first violation
pub fn accumulate_by_lane(violations: impl IntoIterator<Item = Violation>) -> Vec<LaneResult> {
    let mut index: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let mut results: Vec<LaneResult> = Vec::new();

    for violation in violations {
        let Violation {
            check_name,
            reason,
            color,
            entry,
        } = violation;

        let slot = *index.entry(entry.lane_key()).or_insert_with(|| {
            results.push(LaneResult::new(entry));
            results.len() - 1
        });
        results[slot].accumulate(check_name, reason, color);
    }

    results
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending (event, heat, lane)
    Normal,
    /// Latest event first, heats and lanes still ascending
    Reversed,
}

impl SortOrder {
    fn key(self, result: &LaneResult) -> (i64, i64, i64) {
        match self {
            Self::Normal => (result.event_no(), result.heat(), result.lane()),
            Self::Reversed => (-result.event_no(), result.heat(), result.lane()),
        }
    }
}

pub fn sort_lane_results(results: &mut [LaneResult], order: SortOrder) {
    results.sort_by_key(|r| order.key(r));
}
