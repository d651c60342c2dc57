//! Two pad times that disagree by more than a threshold

use super::{swam_cleanly, Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::{MeetData, Participation};
use crate::registry::CheckerKind;
use serde::Deserialize;

pub(crate) const DEFAULT_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwoPadTimesAndInconsistent {
    /// Seconds
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for TwoPadTimesAndInconsistent {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Raced cleanly with exactly two pad times more than `threshold` apart
pub(crate) fn inconsistent_pair(entry: &Participation, threshold: f64) -> bool {
    swam_cleanly(entry)
        && entry.num_pad_times() == 2
        && entry.pad_time_spread().is_some_and(|spread| spread > threshold)
}

impl Checker for TwoPadTimesAndInconsistent {
    fn kind(&self) -> CheckerKind {
        CheckerKind::TwoPadTimesAndInconsistent
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        Ok(data
            .entries
            .iter()
            .filter(|e| inconsistent_pair(e, self.threshold))
            .map(Selection::entry)
            .collect())
    }

    fn reason(&self, selection: &Selection<'_>) -> Reason {
        format!(
            "Only got 2 electronic times and they were {:.2} (which is more than our threshold of {:.2}) apart",
            selection.entry.pad_time_spread().unwrap_or_default(),
            self.threshold
        )
        .into()
    }
}
