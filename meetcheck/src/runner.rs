//! Run every configured check against the merged data
//!
//! Checks run in configuration order. A check that cannot be resolved or
//! fails while running is logged and contributes nothing; the rest carry on.

use crate::checkers::Violation;
use crate::color_wheel::ColorWheel;
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry;
use meetcheck_common::config::CheckConfig;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// `run = false`
    Skipped,
    Failed(CheckError),
    /// Number of violations found
    Completed(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub name: String,
    pub outcome: CheckOutcome,
}

/// Everything one pass over the rule-set produced
#[derive(Debug, Clone, Default)]
pub struct CheckRun {
    /// Check order, then row order within each check
    pub violations: Vec<Violation>,
    pub summaries: Vec<CheckSummary>,
}

impl CheckRun {
    pub fn failed(&self) -> impl Iterator<Item = &CheckSummary> {
        self.summaries
            .iter()
            .filter(|s| matches!(s.outcome, CheckOutcome::Failed(_)))
    }
}

pub fn run_checks(data: &MeetData, checks: &[(String, CheckConfig)]) -> CheckRun {
    let mut wheel = ColorWheel::from_checks(checks);
    let mut run = CheckRun::default();

    for (name, config) in checks {
        if !config.run {
            info!("'{}' is set not to run, skipping it", name);
            run.summaries.push(CheckSummary {
                name: name.clone(),
                outcome: CheckOutcome::Skipped,
            });
            continue;
        }

        let color = wheel.color_for(config);
        let outcome = match registry::resolve(name, config, color).and_then(|check| check.run(data)) {
            Ok(violations) => {
                if violations.is_empty() {
                    info!("Check: {}, no results", name);
                } else {
                    info!("Check: {}, {} results", name, violations.len());
                }
                let count = violations.len();
                run.violations.extend(violations);
                CheckOutcome::Completed(count)
            }
            Err(e) => {
                error!("Failed to run check '{}': {}", name, e);
                CheckOutcome::Failed(e)
            }
        };

        run.summaries.push(CheckSummary {
            name: name.clone(),
            outcome,
        });
    }

    run
}
