//! Finish-time comparison between two versions of the same meet
//!
//! Used to audit hand corrections: dump the database before and after, then
//! list every swim whose finish time changed. Swims are matched on event
//! number and swimmer/team name since heat and lane may have been reseeded.

use crate::model::{MeetData, Participation};
use meetcheck_common::human_time::format_swim_time_opt;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Times closer than this are the same time
const SAME_TIME_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct FinishTimeChange {
    pub event_no: i64,
    pub heat: i64,
    pub lane: i64,
    pub event_name: String,
    pub display_name: String,
    pub before: Option<f64>,
    pub after: Option<f64>,
}

impl FinishTimeChange {
    /// After minus before, when both exist
    pub fn difference(&self) -> Option<f64> {
        Some(self.after? - self.before?)
    }
}

fn same_time(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() < SAME_TIME_TOLERANCE,
        (None, None) => true,
        _ => false,
    }
}

fn recorded(entry: &Participation) -> Option<f64> {
    entry.finish_time().filter(|t| *t > 0.0)
}

/// Swims present in both data sets whose finish times differ
///
/// Heat and lane come from `before`. Sorted by (event, heat, lane).
pub fn compare_finish_times(before: &MeetData, after: &MeetData) -> Vec<FinishTimeChange> {
    let mut after_by_swimmer: HashMap<(i64, &str), Vec<&Participation>> = HashMap::new();
    for entry in &after.entries {
        after_by_swimmer
            .entry((entry.event_no(), entry.display_name()))
            .or_default()
            .push(entry);
    }

    let mut changes: Vec<FinishTimeChange> = before
        .entries
        .iter()
        .flat_map(|old| {
            after_by_swimmer
                .get(&(old.event_no(), old.display_name()))
                .into_iter()
                .flatten()
                .filter(move |new| !same_time(recorded(old), recorded(new)))
                .map(move |new| FinishTimeChange {
                    event_no: old.event_no(),
                    heat: old.heat(),
                    lane: old.lane(),
                    event_name: old.event_name().to_string(),
                    display_name: old.display_name().to_string(),
                    before: recorded(old),
                    after: recorded(new),
                })
        })
        .collect();

    changes.sort_by_key(|c| (c.event_no, c.heat, c.lane));
    changes
}

/// One line per change, for the terminal
pub fn render_changes(changes: &[FinishTimeChange]) -> String {
    let mut out = String::new();
    for c in changes {
        let _ = write!(
            out,
            "Event {} ({}) heat {} lane {}: {}  {} -> {}",
            c.event_no,
            c.event_name,
            c.heat,
            c.lane,
            c.display_name,
            format_swim_time_opt(c.before),
            format_swim_time_opt(c.after)
        );
        if let Some(diff) = c.difference() {
            let _ = write!(out, " ({:+.2})", diff);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::tests::{data_with, entry_with};
    use crate::model::Competitor;

    fn named(lane: (i64, i64, i64), last: &str, finish: Option<f64>) -> crate::model::RaceFields {
        let mut fields = entry_with(lane, finish, [None; 3]);
        fields.competitor = Competitor::Individual {
            last_name: last.to_string(),
            first_name: "Pat".to_string(),
            preferred_name: None,
        };
        fields
    }

    #[test]
    fn test_reports_only_changed_times() {
        let before = data_with(vec![
            named((4, 2, 1), "Lee", Some(31.20)),
            named((4, 1, 3), "Kim", Some(30.00)),
            named((2, 1, 5), "Ray", None),
            named((2, 1, 6), "Fox", Some(29.00)),
        ]);
        let after = data_with(vec![
            named((4, 2, 1), "Lee", Some(31.20)),
            named((4, 1, 3), "Kim", Some(30.42)),
            named((2, 1, 5), "Ray", Some(33.10)),
            named((3, 1, 6), "Fox", Some(28.00)),
        ]);

        let changes = compare_finish_times(&before, &after);
        let names: Vec<&str> = changes.iter().map(|c| c.display_name.as_str()).collect();
        // Fox changed events, so it is not matched
        assert_eq!(names, vec!["Ray, Pat", "Kim, Pat"]);
        assert_eq!(changes[0].before, None);
        assert_eq!(changes[0].after, Some(33.10));

        let diff = changes[1].difference().unwrap();
        assert!((diff - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_render() {
        let before = data_with(vec![named((4, 1, 3), "Kim", Some(30.00))]);
        let after = data_with(vec![named((4, 1, 3), "Kim", Some(30.42))]);
        let text = render_changes(&compare_finish_times(&before, &after));
        assert_eq!(
            text,
            "Event 4 (Girls 9-10 50 Free) heat 1 lane 3: Kim, Pat  30.00 -> 30.42 (+0.42)\n"
        );
    }
}
