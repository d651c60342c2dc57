//! Checker registry
//!
//! A closed set of rule types. A rule-set names one by identifier, either bare
//! (`only_n_or_fewer_pad_times`) or as a dotted path
//! (`meetchecker.checkers.only_n_or_fewer_pad_times`); only the last segment
//! is significant. Parameters are deserialized straight into the checker and
//! unknown keys are rejected.

use crate::checkers::{
    Checker, CompareVsTimeStandard, IncorrectAveragingOfTwoPadTimes, IsARelay, NsButPadTimes,
    OnlyNOrFewerPadTimes, PoppedByPercentThreshold, PoppedTimeStandard, SetNewRecord,
    TwoPadTimesAndInconsistent, Violation,
};
use crate::error::CheckError;
use crate::model::MeetData;
use meetcheck_common::config::CheckConfig;
use serde::de::DeserializeOwned;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckerKind {
    IsARelay,
    NsButPadTimes,
    OnlyNOrFewerPadTimes,
    TwoPadTimesAndInconsistent,
    IncorrectAveragingOfTwoPadTimes,
    CompareVsTimeStandard,
    PoppedTimeStandard,
    SetNewRecord,
    PoppedByPercentThreshold,
}

impl CheckerKind {
    pub const ALL: [CheckerKind; 9] = [
        Self::IsARelay,
        Self::NsButPadTimes,
        Self::OnlyNOrFewerPadTimes,
        Self::TwoPadTimesAndInconsistent,
        Self::IncorrectAveragingOfTwoPadTimes,
        Self::CompareVsTimeStandard,
        Self::PoppedTimeStandard,
        Self::SetNewRecord,
        Self::PoppedByPercentThreshold,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::IsARelay => "is_a_relay",
            Self::NsButPadTimes => "ns_but_pad_times",
            Self::OnlyNOrFewerPadTimes => "only_n_or_fewer_pad_times",
            Self::TwoPadTimesAndInconsistent => "two_pad_times_and_inconsistent",
            Self::IncorrectAveragingOfTwoPadTimes => "incorrect_averaging_of_two_pad_times",
            Self::CompareVsTimeStandard => "compare_vs_time_standard",
            Self::PoppedTimeStandard => "popped_time_standard",
            Self::SetNewRecord => "set_new_record",
            Self::PoppedByPercentThreshold => "popped_by_percent_threshold",
        }
    }

    /// Match a bare or dotted identifier on its last segment
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let tag = identifier.trim().rsplit('.').next()?;
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Instantiate with `params`; the error is a description of what was wrong
    pub fn build(self, params: &toml::Table) -> Result<Box<dyn Checker>, String> {
        match self {
            Self::IsARelay => boxed::<IsARelay>(params),
            Self::NsButPadTimes => boxed::<NsButPadTimes>(params),
            Self::OnlyNOrFewerPadTimes => boxed::<OnlyNOrFewerPadTimes>(params),
            Self::TwoPadTimesAndInconsistent => boxed::<TwoPadTimesAndInconsistent>(params),
            Self::IncorrectAveragingOfTwoPadTimes => {
                boxed::<IncorrectAveragingOfTwoPadTimes>(params)
            }
            Self::CompareVsTimeStandard => boxed::<CompareVsTimeStandard>(params),
            Self::PoppedTimeStandard => boxed::<PoppedTimeStandard>(params),
            Self::SetNewRecord => boxed::<SetNewRecord>(params),
            Self::PoppedByPercentThreshold => boxed::<PoppedByPercentThreshold>(params),
        }
    }
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn boxed<T>(params: &toml::Table) -> Result<Box<dyn Checker>, String>
where
    T: Checker + DeserializeOwned + 'static,
{
    toml::Value::Table(params.clone())
        .try_into::<T>()
        .map(|checker| Box::new(checker) as Box<dyn Checker>)
        .map_err(|e| e.message().to_string())
}

/// A resolved, runnable check
#[derive(Debug)]
pub struct ConfiguredCheck {
    pub name: String,
    pub color: String,
    pub checker: Box<dyn Checker>,
}

impl ConfiguredCheck {
    pub fn run(&self, data: &MeetData) -> Result<Vec<Violation>, CheckError> {
        self.checker.run(&self.name, &self.color, data)
    }
}

/// Resolve one rule-set entry to a runnable check
pub fn resolve(name: &str, config: &CheckConfig, color: String) -> Result<ConfiguredCheck, CheckError> {
    let kind =
        CheckerKind::from_identifier(&config.checker).ok_or_else(|| CheckError::UnknownChecker {
            check: name.to_string(),
            identifier: config.checker.clone(),
        })?;

    let checker = kind
        .build(&config.params)
        .map_err(|message| CheckError::InvalidParams {
            check: name.to_string(),
            identifier: config.checker.clone(),
            message,
        })?;

    Ok(ConfiguredCheck {
        name: name.to_string(),
        color,
        checker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(checker: &str, params: &str) -> CheckConfig {
        CheckConfig {
            checker: checker.to_string(),
            params: toml::from_str(params).unwrap(),
            run: true,
            color: None,
        }
    }

    #[test]
    fn test_identifiers_bare_and_dotted() {
        assert_eq!(
            CheckerKind::from_identifier("is_a_relay"),
            Some(CheckerKind::IsARelay)
        );
        assert_eq!(
            CheckerKind::from_identifier("meetchecker.checkers.set_new_record"),
            Some(CheckerKind::SetNewRecord)
        );
        assert_eq!(CheckerKind::from_identifier("meetchecker.checkers"), None);
        assert_eq!(CheckerKind::from_identifier(""), None);
    }

    #[test]
    fn test_every_kind_round_trips_its_tag() {
        for kind in CheckerKind::ALL {
            assert_eq!(CheckerKind::from_identifier(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_resolve_with_params() {
        let check = resolve("few", &config("only_n_or_fewer_pad_times", "n = 2"), "#fff".into()).unwrap();
        assert_eq!(check.name, "few");
        assert_eq!(check.checker.kind(), CheckerKind::OnlyNOrFewerPadTimes);
    }

    #[test]
    fn test_defaults_apply_without_params() {
        let check = resolve("pops", &config("popped_by_percent_threshold", ""), "#fff".into()).unwrap();
        assert_eq!(check.checker.kind(), CheckerKind::PoppedByPercentThreshold);
    }

    #[test]
    fn test_integer_threshold_is_accepted() {
        assert!(resolve("pops", &config("popped_by_percent_threshold", "threshold = 15"), "#fff".into()).is_ok());
    }

    #[test]
    fn test_unknown_checker() {
        let err = resolve("x", &config("no_such_checker", ""), "#fff".into()).unwrap_err();
        assert!(matches!(err, CheckError::UnknownChecker { ref identifier, .. } if identifier == "no_such_checker"));
    }

    #[test]
    fn test_bad_params() {
        // Missing required parameter
        let err = resolve("std", &config("compare_vs_time_standard", ""), "#fff".into()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidParams { .. }));

        // Unknown parameter
        let err = resolve("few", &config("only_n_or_fewer_pad_times", "count = 1"), "#fff".into()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidParams { .. }));

        // Wrong type
        let err = resolve("few", &config("only_n_or_fewer_pad_times", "n = \"one\""), "#fff".into()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidParams { .. }));
    }
}
