//! Finish time taken as the average of two disagreeing pad times
//!
//! When two pads disagree the timer should pick the better-looking one from
//! the time sheets; averaging them produces a time nobody actually swam.

use super::two_pad_times_and_inconsistent::{inconsistent_pair, DEFAULT_THRESHOLD};
use super::{finish_time, Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::{MeetData, Participation};
use crate::registry::CheckerKind;
use serde::Deserialize;

/// Finish and pad-average within this many seconds count as equal
pub const AVERAGE_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncorrectAveragingOfTwoPadTimes {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for IncorrectAveragingOfTwoPadTimes {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

fn finish_is_pad_average(entry: &Participation) -> bool {
    match (finish_time(entry), entry.min_pad_time(), entry.max_pad_time()) {
        (Some(fin), Some(min), Some(max)) => (fin - (min + max) / 2.0).abs() <= AVERAGE_TOLERANCE,
        _ => false,
    }
}

impl Checker for IncorrectAveragingOfTwoPadTimes {
    fn kind(&self) -> CheckerKind {
        CheckerKind::IncorrectAveragingOfTwoPadTimes
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        Ok(data
            .entries
            .iter()
            .filter(|e| inconsistent_pair(e, self.threshold) && finish_is_pad_average(e))
            .map(Selection::entry)
            .collect())
    }

    fn reason(&self, selection: &Selection<'_>) -> Reason {
        let entry = selection.entry;
        format!(
            "Incorrectly used average ({:.2}) of 2 electronic times ({:.2}, {:.2}) that were far apart \
             ({:.2} secs). Instead you should check time sheets and pick whichever electronic time looks better.",
            entry.finish_time().unwrap_or_default(),
            entry.min_pad_time().unwrap_or_default(),
            entry.max_pad_time().unwrap_or_default(),
            entry.pad_time_spread().unwrap_or_default(),
        )
        .into()
    }
}
