//! Swims with too few pad touches to trust the electronic time

use super::{Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnlyNOrFewerPadTimes {
    #[serde(default = "default_n")]
    pub n: usize,
}

fn default_n() -> usize {
    1
}

impl Default for OnlyNOrFewerPadTimes {
    fn default() -> Self {
        Self { n: default_n() }
    }
}

impl Checker for OnlyNOrFewerPadTimes {
    fn kind(&self) -> CheckerKind {
        CheckerKind::OnlyNOrFewerPadTimes
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        Ok(data
            .entries
            .iter()
            .filter(|e| {
                !e.status().is_no_show() && e.num_pad_times() > 0 && e.num_pad_times() <= self.n
            })
            .map(Selection::entry)
            .collect())
    }

    fn reason(&self, selection: &Selection<'_>) -> Reason {
        format!("Only got {} electronic times", selection.entry.num_pad_times()).into()
    }
}
