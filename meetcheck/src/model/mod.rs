//! Tabular data model
//!
//! Raw exported tables are merged once per run into [`MeetData`]: the
//! participation records every checker reads, plus the time standards and
//! records that threshold checkers join against.

pub mod builder;
pub mod participation;
pub mod standards;

pub use participation::{Competitor, FinishStatus, Participation, RaceFields};
pub use standards::{Benchmark, BenchmarkSet, EventKey};

/// Everything a check run reads
#[derive(Debug, Clone, Default)]
pub struct MeetData {
    /// Individual entries first, then relays
    pub entries: Vec<Participation>,
    pub time_standards: BenchmarkSet,
    pub records: BenchmarkSet,
}
