//! Column-labeled raw tables
//!
//! A [`RawTable`] is exactly what the export tool hands back: a header row and
//! string cells. Headers are matched case-insensitively because the meet
//! database mixes `Fin_Time`, `High_Age` and `tag_ptr` styles freely.

use crate::error::{Error, Result};

/// One exported table: lowercased headers plus string cells
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table directly (tests, in-memory sources)
    pub fn new<S: AsRef<str>>(name: &str, headers: &[S], rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| normalize_header(h.as_ref())).collect(),
            rows,
        }
    }

    /// Parse CSV text as produced by `mdb-export`
    ///
    /// Rows shorter than the header are padded with empty cells.
    pub fn from_csv(name: &str, text: &str) -> Result<Self> {
        let csv_err = |source| Error::Csv {
            table: name.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        let wanted = normalize_header(column);
        self.headers.iter().position(|h| *h == wanted)
    }

    /// Fail with [`Error::MissingColumn`] naming the first absent column
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| self.column_index(c).is_none()) {
            Some(missing) => Err(Error::MissingColumn {
                table: self.name.clone(),
                column: (*missing).to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(move |values| RawRow {
            table: self,
            values,
        })
    }

    /// Render back to CSV (used by `dump`)
    pub fn to_csv(&self) -> Result<String> {
        let csv_err = |source| Error::Csv {
            table: self.name.clone(),
            source,
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_err)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Report(format!("CSV buffer error: {}", e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_ascii_lowercase()
}

/// Borrowed view of one row with typed, forgiving accessors
///
/// Blank or unparseable cells read as `None`: partial data is normal input.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    table: &'a RawTable,
    values: &'a [String],
}

impl<'a> RawRow<'a> {
    /// Trimmed, non-empty text
    pub fn text(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        let value = self.values.get(idx)?.trim();
        (!value.is_empty()).then_some(value)
    }

    /// Trimmed text, empty string when absent
    pub fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default().to_string()
    }

    pub fn float(&self, column: &str) -> Option<f64> {
        self.text(column)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Integer cell; `50.0`-style exports are accepted and truncated
    pub fn int(&self, column: &str) -> Option<i64> {
        let text = self.text(column)?;
        text.parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Ath_no,Last_name,First_name,Fin_Time\n1,\" Smith \",Anna,28.70\n2,Jones,,\n3,Lee\n";

    #[test]
    fn test_headers_are_case_insensitive() {
        let table = RawTable::from_csv("athlete", CSV).unwrap();
        assert_eq!(table.column_index("ATH_NO"), Some(0));
        assert_eq!(table.column_index("fin_time"), Some(3));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_typed_accessors() {
        let table = RawTable::from_csv("athlete", CSV).unwrap();
        let rows: Vec<RawRow> = table.rows().collect();

        assert_eq!(rows[0].text("last_name"), Some("Smith"));
        assert_eq!(rows[0].float("fin_time"), Some(28.7));
        assert_eq!(rows[0].int("ath_no"), Some(1));

        assert_eq!(rows[1].text("first_name"), None);
        assert_eq!(rows[1].float("fin_time"), None);
        // Short rows are padded
        assert_eq!(rows[2].text("fin_time"), None);
    }

    #[test]
    fn test_int_accepts_float_text() {
        let table = RawTable::new("event", &["event_dist"], vec![vec!["100.0".to_string()]]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.int("event_dist"), Some(100));
    }

    #[test]
    fn test_require_columns() {
        let table = RawTable::from_csv("athlete", CSV).unwrap();
        assert!(table.require_columns(&["Ath_no", "Last_name"]).is_ok());

        let err = table.require_columns(&["Ath_no", "Team_no"]).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumn { ref table, ref column } if table == "athlete" && column == "Team_no"
        ));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let table = RawTable::from_csv("relay", "Event_ptr,Team_no\n").unwrap();
        assert!(table.is_empty());
        assert!(table.require_columns(&["event_ptr"]).is_ok());
    }

    #[test]
    fn test_csv_roundtrip_keeps_headers() {
        let table = RawTable::from_csv("athlete", CSV).unwrap();
        let text = table.to_csv().unwrap();
        let again = RawTable::from_csv("athlete", &text).unwrap();
        assert_eq!(again.headers(), table.headers());
        assert_eq!(again.len(), 3);
    }
}
