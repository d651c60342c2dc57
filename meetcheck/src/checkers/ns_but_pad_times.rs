//! Scratched swims that nevertheless registered pad touches

use super::{Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NsButPadTimes {
    /// Minimum number of pad times that makes a no-show suspicious (at least 1)
    #[serde(default = "default_n")]
    pub n: usize,
}

fn default_n() -> usize {
    1
}

impl Default for NsButPadTimes {
    fn default() -> Self {
        Self { n: default_n() }
    }
}

impl Checker for NsButPadTimes {
    fn kind(&self) -> CheckerKind {
        CheckerKind::NsButPadTimes
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        Ok(data
            .entries
            .iter()
            .filter(|e| e.status().is_no_show() && e.num_pad_times() >= self.n.max(1))
            .map(Selection::entry)
            .collect())
    }

    fn reason(&self, selection: &Selection<'_>) -> Reason {
        format!(
            "Marked as a no-show but got {} electronic times",
            selection.entry.num_pad_times()
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::tests::{data_with, entry_with};
    use crate::model::FinishStatus;

    #[test]
    fn test_flags_no_show_with_pads() {
        let mut scratched = entry_with((5, 2, 3), None, [Some(31.2), None, None]);
        scratched.status = FinishStatus::NoShow;
        let mut scratched_clean = entry_with((5, 2, 4), None, [None; 3]);
        scratched_clean.status = FinishStatus::NoShow;
        let swam = entry_with((5, 2, 5), Some(31.0), [Some(31.0), None, None]);

        let data = data_with(vec![scratched, scratched_clean, swam]);
        let checker = NsButPadTimes::default();
        let selected = checker.select(&data).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].entry.lane(), 3);
        assert_eq!(
            checker.reason(&selected[0]),
            "Marked as a no-show but got 1 electronic times"
        );
    }

    #[test]
    fn test_n_raises_the_bar() {
        let mut scratched = entry_with((5, 2, 3), None, [Some(31.2), None, None]);
        scratched.status = FinishStatus::NoShow;
        let data = data_with(vec![scratched]);

        assert!(NsButPadTimes { n: 2 }.select(&data).unwrap().is_empty());
    }
}
