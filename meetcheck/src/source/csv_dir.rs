//! Dumped-table directories: one `<table>.csv` per table

use super::{columns, TableSource};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads tables previously written by [`dump_tables`]
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }
}

impl TableSource for CsvDirectory {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn table_text(&self, table: &str) -> Result<String> {
        let path = self.table_path(table);
        std::fs::read_to_string(&path).map_err(|e| Error::Extraction {
            table: table.to_string(),
            message: format!("could not read {}: {}", path.display(), e),
        })
    }
}

/// Export every table from `source` into `output_dir` as `<table>.csv`
///
/// Existing files are left alone unless `overwrite` is set; the check runs
/// before anything is written.
pub fn dump_tables(
    source: &dyn TableSource,
    output_dir: &Path,
    overwrite: bool,
) -> Result<Vec<PathBuf>> {
    if !output_dir.is_dir() {
        return Err(Error::Common(meetcheck_common::Error::NotFound(format!(
            "Output directory {} does not exist",
            output_dir.display()
        ))));
    }

    let target = CsvDirectory::new(output_dir);
    if !overwrite {
        if let Some(existing) = columns::ALL_TABLES
            .iter()
            .map(|t| target.table_path(t))
            .find(|p| p.exists())
        {
            return Err(Error::AlreadyExists(existing.display().to_string()));
        }
    }

    let mut written = Vec::with_capacity(columns::ALL_TABLES.len());
    for table in columns::ALL_TABLES {
        let data = source.load_table(table)?;
        let path = target.table_path(table);
        std::fs::write(&path, data.to_csv()?)?;
        info!("Dumped table '{}' to {}", table, path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_table_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("team.csv"), "Team_no,Team_abbr\n1,SHRK\n").unwrap();

        let source = CsvDirectory::new(temp_dir.path());
        let table = source.load_table("team").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows().next().unwrap().text("team_abbr"), Some("SHRK"));
    }

    #[test]
    fn test_missing_table_file_is_extraction_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = CsvDirectory::new(temp_dir.path());
        assert!(matches!(
            source.table_text("relay"),
            Err(Error::Extraction { .. })
        ));
    }

    #[test]
    fn test_dump_copies_every_table() {
        let from = TempDir::new().unwrap();
        for table in columns::ALL_TABLES {
            std::fs::write(from.path().join(format!("{}.csv", table)), "a,b\n1,2\n").unwrap();
        }
        let to = TempDir::new().unwrap();

        let written = dump_tables(&CsvDirectory::new(from.path()), to.path(), false).unwrap();
        assert_eq!(written.len(), columns::ALL_TABLES.len());
        assert!(to.path().join("timestd.csv").exists());

        // Second dump refuses to overwrite without the flag
        let err = dump_tables(&CsvDirectory::new(from.path()), to.path(), false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert!(dump_tables(&CsvDirectory::new(from.path()), to.path(), true).is_ok());
    }
}
