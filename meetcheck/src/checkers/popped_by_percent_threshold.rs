//! Big drops relative to seed time, often a sign of a mis-entered seed

use super::{finish_time, percent, swam_cleanly, Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::{MeetData, Participation};
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoppedByPercentThreshold {
    /// Percent of seed time
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    10.0
}

impl Default for PoppedByPercentThreshold {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn pop_percent(entry: &Participation) -> Option<f64> {
    let popped = entry.popped_by().filter(|p| *p > 0.0)?;
    Some(percent(popped, entry.seed_time()?))
}

impl Checker for PoppedByPercentThreshold {
    fn kind(&self) -> CheckerKind {
        CheckerKind::PoppedByPercentThreshold
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        Ok(data
            .entries
            .iter()
            .filter(|e| swam_cleanly(e) && finish_time(e).is_some())
            .filter(|e| pop_percent(e).is_some_and(|pct| pct >= self.threshold))
            .map(Selection::entry)
            .collect())
    }

    fn reason(&self, selection: &Selection<'_>) -> Reason {
        let entry = selection.entry;
        format!(
            "Time of {:.2} compared to seed time of {:.2} is a pop of {:.2} seconds / {:.1} percent",
            entry.finish_time().unwrap_or_default(),
            entry.seed_time().unwrap_or_default(),
            entry.popped_by().unwrap_or_default(),
            pop_percent(entry).unwrap_or_default()
        )
        .into()
    }
}
