//! Swims at or under a named record

use super::{finish_time, join_benchmarks, percent, Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetNewRecord {
    /// `tag_name` of the record set, e.g. `Pool Record`
    pub record_name: String,
}

impl Checker for SetNewRecord {
    fn kind(&self) -> CheckerKind {
        CheckerKind::SetNewRecord
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        let records = data.records.named(&self.record_name);
        if records.is_empty() {
            return Err(CheckError::UnknownRecord(self.record_name.clone()));
        }

        Ok(join_benchmarks(&data.entries, &records)
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
        let record = selection.benchmark_time();
        let by = record - fin;
        format!(
            "Time of {:.2} would break '{}' record  of {:.2} by {:.2} seconds / {:.1} percent",
            fin,
            self.record_name,
            record,
            by,
            percent(by, record)
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::tests::{benchmark, data_with, entry_with};
    use crate::model::{BenchmarkSet, FinishStatus};

    fn pool_record_data() -> MeetData {
        let fast = entry_with((3, 1, 4), Some(28.0), [None; 3]);
        let slow = entry_with((3, 1, 5), Some(29.0), [None; 3]);
        let mut scratched = entry_with((3, 1, 6), Some(27.0), [None; 3]);
        scratched.status = FinishStatus::NoShow;
        let unraced = entry_with((3, 0, 0), Some(27.0), [None; 3]);
        let no_time = entry_with((3, 1, 7), None, [None; 3]);

        let mut data = data_with(vec![fast, slow, scratched, unraced, no_time]);
        let key = data.entries[0].event_key();
        data.records = BenchmarkSet::new(vec![benchmark("Pool Record", key, 28.8)]);
        data
    }

    fn pool_record() -> SetNewRecord {
        SetNewRecord {
            record_name: "Pool Record".to_string(),
        }
    }

    #[test]
    fn test_record_breakers() {
        let data = pool_record_data();
        let checker = pool_record();
        let selected = checker.select(&data).unwrap();

        // Scratched, unraced and untimed swims never break a record
        let lanes: Vec<i64> = selected.iter().map(|s| s.entry.lane()).collect();
        assert_eq!(lanes, vec![4]);
        assert_eq!(
            checker.reason(&selected[0]),
            "Time of 28.00 would break 'Pool Record' record  of 28.80 by 0.80 seconds / 2.8 percent"
        );
    }

    #[test]
    fn test_repeated_runs_agree() {
        let data = pool_record_data();
        let checker = pool_record();
        let first = checker.run("records", "#00bfff", &data).unwrap();
        let second = checker.run("records", "#00bfff", &data).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_record_is_an_error() {
        let checker = SetNewRecord {
            record_name: "Meet Record".to_string(),
        };
        assert_eq!(
            checker.select(&MeetData::default()).unwrap_err().to_string(),
            "No timing data found for record with name 'Meet Record'"
        );
    }
}
