//! Live extraction through the `mdb-export` tool (mdbtools)

use super::TableSource;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default export program, looked up on `PATH`
pub const DEFAULT_PROGRAM: &str = "mdb-export";

/// Extracts tables from a meet database by running `mdb-export <db> <table>`
#[derive(Debug, Clone)]
pub struct MdbExport {
    database: PathBuf,
    program: String,
}

impl MdbExport {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Use a different export executable (wrapper scripts, non-PATH installs)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn database(&self) -> &Path {
        &self.database
    }
}

impl TableSource for MdbExport {
    fn describe(&self) -> String {
        self.database.display().to_string()
    }

    fn table_text(&self, table: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(&self.database)
            .arg(table)
            .output()
            .map_err(|e| Error::Extraction {
                table: table.to_string(),
                message: format!("could not run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction {
                table: table.to_string(),
                message: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
