//! Swimmers who came in slower than a standard and beat it in this race

use super::{finish_time, join_benchmarks, percent, swam_cleanly, Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoppedTimeStandard {
    pub time_standard: String,
}

impl Checker for PoppedTimeStandard {
    fn kind(&self) -> CheckerKind {
        CheckerKind::PoppedTimeStandard
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        let standards = data.time_standards.named(&self.time_standard);
        if standards.is_empty() {
            return Err(CheckError::UnknownStandard(self.time_standard.clone()));
        }

        Ok(join_benchmarks(&data.entries, &standards)
            .into_iter()
            .filter(|s| {
                let standard = s.benchmark_time();
                swam_cleanly(s.entry)
                    && s.entry.popped_by().is_some_and(|p| p > 0.0)
                    && finish_time(s.entry).is_some_and(|fin| fin <= standard)
                    && s.entry.seed_time().is_some_and(|seed| seed > standard)
            })
            .collect())
    }

    /// Standard name and margin are emphasized
    fn reason(&self, selection: &Selection<'_>) -> Reason {
        let entry = selection.entry;
        let fin = entry.finish_time().unwrap_or_default();
        let standard = selection.benchmark_time();
        let by = standard - fin;
        Reason::new()
            .text(format!(
                "Time of {:.2} popped by {:.2} seconds and would break ",
                fin,
                entry.popped_by().unwrap_or_default()
            ))
            .emphasis(self.time_standard.as_str())
            .text(format!(" standard of {:.2} by ", standard))
            .emphasis(format!("{:.2} seconds / {:.1}%", by, percent(by, standard)))
    }
}
