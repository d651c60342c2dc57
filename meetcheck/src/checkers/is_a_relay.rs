//! Flags every relay swim (handy for eyeballing relay results)

use super::{Checker, Reason, Selection};
use crate::error::CheckError;
use crate::model::MeetData;
use crate::registry::CheckerKind;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsARelay {}

impl Checker for IsARelay {
    fn kind(&self) -> CheckerKind {
        CheckerKind::IsARelay
    }

    fn select<'a>(&self, data: &'a MeetData) -> Result<Vec<Selection<'a>>, CheckError> {
        Ok(data
            .entries
            .iter()
            .filter(|e| e.is_relay())
            .map(Selection::entry)
            .collect())
    }

    fn reason(&self, _selection: &Selection<'_>) -> Reason {
        Reason::from("Its a relay")
    }
}
