//! Anomaly checkers
//!
//! Each checker encodes one detection rule. [`Checker::select`] picks the
//! offending rows out of the merged data; [`Checker::reason`] explains one of
//! them. Status codes: `R` is a no-show (did not swim), `Q` a
//! disqualification. A swim is only considered raced when its heat is not 0.

pub mod compare_vs_time_standard;
pub mod incorrect_averaging_of_two_pad_times;
pub mod is_a_relay;
pub mod ns_but_pad_times;
pub mod only_n_or_fewer_pad_times;
pub mod popped_by_percent_threshold;
pub mod popped_time_standard;
pub mod reason;
pub mod set_new_record;
pub mod two_pad_times_and_inconsistent;

pub use compare_vs_time_standard::CompareVsTimeStandard;
pub use incorrect_averaging_of_two_pad_times::IncorrectAveragingOfTwoPadTimes;
pub use is_a_relay::IsARelay;
pub use ns_but_pad_times::NsButPadTimes;
pub use only_n_or_fewer_pad_times::OnlyNOrFewerPadTimes;
pub use popped_by_percent_threshold::PoppedByPercentThreshold;
pub use popped_time_standard::PoppedTimeStandard;
pub use reason::{Reason, ReasonPart};
pub use set_new_record::SetNewRecord;
pub use two_pad_times_and_inconsistent::TwoPadTimesAndInconsistent;

use crate::error::CheckError;
use crate::model::{Benchmark, EventKey, MeetData, Participation};
use crate::registry::CheckerKind;
use std::collections::HashMap;
use std::fmt::Debug;

/// One row picked by a checker, with the benchmark it was compared to (if any)
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub entry: &'a Participation,
    pub benchmark: Option<&'a Benchmark>,
}

impl<'a> Selection<'a> {
    pub fn entry(entry: &'a Participation) -> Self {
        Self {
            entry,
            benchmark: None,
        }
    }

    /// Benchmark time, 0 when the checker does not compare against one
    pub fn benchmark_time(&self) -> f64 {
        self.benchmark.map(|b| b.time).unwrap_or_default()
    }
}

/// A detection rule
pub trait Checker: Debug + Send + Sync {
    fn kind(&self) -> CheckerKind;

    /// Rows violating the rule, in data order
    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError>;

    /// Human-readable explanation for one selected row
    fn reason(&self, selection: &Selection<'_>) -> Reason;

    /// Select and explain: one [`Violation`] per offending row
    fn run(&self, check_name: &str, color: &str, data: &MeetData) -> Result<Vec<Violation>, CheckError> {
        Ok(self
            .select(data)?
            .iter()
            .map(|selection| Violation {
                check_name: check_name.to_string(),
                reason: self.reason(selection),
                color: color.to_string(),
                entry: selection.entry.clone(),
            })
            .collect())
    }
}

/// One rule hit: a snapshot of the entry plus why and how to show it
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub check_name: String,
    pub reason: Reason,
    pub color: String,
    pub entry: Participation,
}

/// Not scratched, not disqualified, and seeded into a heat
pub(crate) fn swam_cleanly(entry: &Participation) -> bool {
    !entry.status().is_no_show() && !entry.status().is_disqualified() && entry.raced()
}

/// Recorded finish time, ignoring blanks and zeros
pub(crate) fn finish_time(entry: &Participation) -> Option<f64> {
    entry.finish_time().filter(|t| *t > 0.0)
}

/// Percentage of `part` relative to `whole`
pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        100.0 * part / whole
    }
}

/// Pair entries with every benchmark sharing their event key, entry order first
pub(crate) fn join_benchmarks<'a>(
    entries: &'a [Participation],
    benchmarks: &[&'a Benchmark],
) -> Vec<Selection<'a>> {
    let mut by_key: HashMap<&EventKey, Vec<&'a Benchmark>> = HashMap::new();
    for &b in benchmarks {
        by_key.entry(&b.key).or_default().push(b);
    }

    let mut joined = Vec::new();
    for entry in entries {
        if let Some(matches) = by_key.get(&entry.event_key()) {
            joined.extend(matches.iter().map(|b| Selection {
                entry,
                benchmark: Some(*b),
            }));
        }
    }
    joined
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::participation::tests::sample_fields;
    use crate::model::{BenchmarkSet, FinishStatus, RaceFields};

    /// Entry at (event, heat, lane) with the given finish and pad times
    pub(crate) fn entry_with(
        lane: (i64, i64, i64),
        finish: Option<f64>,
        pads: [Option<f64>; 3],
    ) -> RaceFields {
        let mut fields = sample_fields();
        (fields.event_no, fields.heat, fields.lane) = lane;
        fields.finish_time = finish;
        fields.pad_times = pads;
        fields
    }

    pub(crate) fn data_with(entries: Vec<RaceFields>) -> MeetData {
        MeetData {
            entries: entries.into_iter().map(Participation::new).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn benchmark(name: &str, key: EventKey, time: f64) -> Benchmark {
        Benchmark {
            name: name.to_string(),
            key,
            time,
        }
    }

    #[test]
    fn test_swam_cleanly() {
        let mut fields = sample_fields();
        assert!(swam_cleanly(&Participation::new(fields.clone())));

        fields.status = FinishStatus::Disqualified;
        assert!(!swam_cleanly(&Participation::new(fields.clone())));

        fields.status = FinishStatus::Normal;
        fields.heat = 0;
        assert!(!swam_cleanly(&Participation::new(fields)));
    }

    #[test]
    fn test_join_benchmarks_matches_on_full_key() {
        let mut data = data_with(vec![sample_fields(), {
            let mut other = sample_fields();
            other.distance = 100;
            other
        }]);
        let key = data.entries[0].event_key();
        data.time_standards = BenchmarkSet::new(vec![
            benchmark("Sectionals", key.clone(), 29.0),
            benchmark("Sectionals", EventKey { low_age: 11, high_age: 12, ..key }, 27.0),
        ]);

        let selected = join_benchmarks(&data.entries, &data.time_standards.named("Sectionals"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].entry.raw().distance, 50);
        assert_eq!(selected[0].benchmark_time(), 29.0);
    }

    #[test]
    fn test_run_attaches_name_and_color() {
        let mut relay = sample_fields();
        relay.ind_rel = "R".to_string();
        let data = data_with(vec![sample_fields(), relay]);

        let violations = IsARelay::default().run("relays", "#fd0e35", &data).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].check_name, "relays");
        assert_eq!(violations[0].color, "#fd0e35");
        assert_eq!(violations[0].reason, "Its a relay");
    }
}
