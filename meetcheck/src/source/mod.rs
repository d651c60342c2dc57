//! Table extraction
//!
//! The meet database is never read directly. Each table is exported to CSV,
//! either live through `mdb-export` ([`MdbExport`]) or from a directory of
//! previously dumped files ([`CsvDirectory`]). Both sit behind [`TableSource`]
//! so the rest of the pipeline does not care which one is in use.

pub mod columns;
pub mod csv_dir;
pub mod mdb;
pub mod raw;

pub use csv_dir::{dump_tables, CsvDirectory};
pub use mdb::MdbExport;
pub use raw::{RawRow, RawTable};

use crate::error::Result;
use tracing::debug;

/// Anything that can hand back column-labeled CSV text for a named table
pub trait TableSource {
    /// Human-readable description for logs and report captions
    fn describe(&self) -> String;

    /// CSV text (header row first) for `table`
    fn table_text(&self, table: &str) -> Result<String>;

    fn load_table(&self, table: &str) -> Result<RawTable> {
        let table_data = RawTable::from_csv(table, &self.table_text(table)?)?;
        debug!("Loaded table '{}' ({} rows)", table, table_data.len());
        Ok(table_data)
    }

    /// Extract the full fixed table set
    fn load_all(&self) -> Result<RawTables> {
        Ok(RawTables {
            team: self.load_table(columns::TEAM)?,
            event: self.load_table(columns::EVENT)?,
            athlete: self.load_table(columns::ATHLETE)?,
            entry: self.load_table(columns::ENTRY)?,
            relay: self.load_table(columns::RELAY)?,
            tag_names: self.load_table(columns::TAG_NAMES)?,
            time_standards: self.load_table(columns::TIME_STANDARDS)?,
            records: self.load_table(columns::RECORDS)?,
            record_tags: self.load_table(columns::RECORD_TAGS)?,
        })
    }
}

/// The complete raw table set for one meet
#[derive(Debug, Clone)]
pub struct RawTables {
    pub team: RawTable,
    pub event: RawTable,
    pub athlete: RawTable,
    pub entry: RawTable,
    pub relay: RawTable,
    pub tag_names: RawTable,
    pub time_standards: RawTable,
    pub records: RawTable,
    pub record_tags: RawTable,
}
