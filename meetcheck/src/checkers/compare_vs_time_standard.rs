//! Swims at or under a named qualifying time standard

use super::{finish_time, join_benchmarks, percent, Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareVsTimeStandard {
    /// `tag_name` of the standard, e.g. `Sectionals`
    pub time_standard: String,
}

impl Checker for CompareVsTimeStandard {
    fn kind(&self) -> CheckerKind {
        CheckerKind::CompareVsTimeStandard
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        let standards = data.time_standards.named(&self.time_standard);
        if standards.is_empty() {
            return Err(CheckError::UnknownStandard(self.time_standard.clone()));
        }

        Ok(join_benchmarks(&data.entries, &standards)
            .into_iter()
            .filter(|s| {
                !s.entry.status().is_no_show()
                    && s.entry.raced()
                    && finish_time(s.entry).is_some_and(|fin| fin <= s.benchmark_time())
            })
            .collect())
    }

    fn reason(&self, selection: &Selection<'_>) -> Reason {
        let fin = selection.entry.finish_time().unwrap_or_default();
        let standard = selection.benchmark_time();
        let by = standard - fin;
        format!(
            "Time of {:.2} would break {} standard of {:.2} by {:.2} seconds / {:.1} percent",
            fin,
            self.time_standard,
            standard,
            by,
            percent(by, standard)
        )
        .into()
    }
}
