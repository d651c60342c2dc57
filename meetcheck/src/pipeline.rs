//! One report generation: extract, merge, check, accumulate, render
//!
//! Everything that can fail fatally (extraction, missing columns) happens
//! before the first report file is written.

use crate::accumulator::{accumulate_by_lane, sort_lane_results, LaneResult, SortOrder};
use crate::error::{Error, Result};
use crate::model::MeetData;
use crate::report::write_html_report;
use crate::runner::{run_checks, CheckSummary};
use crate::source::TableSource;
use meetcheck_common::config::{reversed_output_path, CheckConfig, RuleSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load a rule-set and insist it defines at least one check
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let rule_set = RuleSet::load(path)?;
    if rule_set.checks.is_empty() {
        return Err(Error::NoChecks(path.display().to_string()));
    }
    Ok(rule_set)
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Event-ascending report
    pub output: PathBuf,
    /// Latest-event-first report
    pub reversed_output: PathBuf,
    /// Lane results in normal order
    pub lane_results: Vec<LaneResult>,
    pub summaries: Vec<CheckSummary>,
}

/// Merge and check, without writing anything
pub fn check_meet(
    source: &dyn TableSource,
    checks: &[(String, CheckConfig)],
) -> Result<(Vec<LaneResult>, Vec<CheckSummary>)> {
    let tables = source.load_all()?;
    let data = MeetData::build(&tables)?;

    let run = run_checks(&data, checks);
    let mut lane_results = accumulate_by_lane(run.violations);
    sort_lane_results(&mut lane_results, SortOrder::Normal);
    Ok((lane_results, run.summaries))
}

/// Run all checks and write `output` plus its `_rev` companion
pub fn generate_report(
    source: &dyn TableSource,
    checks: &[(String, CheckConfig)],
    output: &Path,
) -> Result<ReportOutcome> {
    let description = source.describe();
    let (lane_results, summaries) = check_meet(source, checks)?;

    write_html_report(&lane_results, &description, output)?;

    let reversed_output = reversed_output_path(output);
    let mut reversed = lane_results.clone();
    sort_lane_results(&mut reversed, SortOrder::Reversed);
    write_html_report(&reversed, &description, &reversed_output)?;

    info!(
        "Wrote {} flagged lanes to {} and {}",
        lane_results.len(),
        output.display(),
        reversed_output.display()
    );

    Ok(ReportOutcome {
        output: output.to_path_buf(),
        reversed_output,
        lane_results,
        summaries,
    })
}
