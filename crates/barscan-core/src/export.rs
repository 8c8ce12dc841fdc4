//! # CSV Export
//!
//! Renders the result list as a delimited text file.
//!
//! ## File Layout
//! ```text
//! STT,Barcode,Format,Thời gian
//! 1,"XYZ999","CODE_128","09:30:05 14/10/2026"     ◄── most recent scan
//! 2,"ABC123","CODE_128","09:30:01 14/10/2026"
//! 3,"ABC123","CODE_128","09:29:58 14/10/2026"     ◄── oldest scan
//! ```
//!
//! - `STT` (số thứ tự) is the 1-based position counted from the newest scan
//! - Every other field is double-quoted; embedded quotes are doubled
//! - Filename: `barcodes_<epoch-millis>.csv` using the export time

use chrono::{DateTime, Utc};

use crate::error::ExportError;
use crate::store::ResultStore;
use crate::types::ScanEvent;

/// Fixed header row.
pub const CSV_HEADER: &str = "STT,Barcode,Format,Thời gian";

/// A rendered export, ready to be written wherever the caller "downloads" to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
    pub rows: usize,
}

impl CsvExport {
    /// Renders `events` (already newest-first) at `exported_at`.
    ///
    /// ## Errors
    /// [`ExportError::Empty`] when there is nothing to export.
    pub fn render<'a, I>(events: I, exported_at: DateTime<Utc>) -> Result<Self, ExportError>
    where
        I: IntoIterator<Item = &'a ScanEvent>,
    {
        let mut contents = String::from(CSV_HEADER);
        contents.push('\n');

        let mut rows = 0;
        for (index, event) in events.into_iter().enumerate() {
            rows += 1;
            contents.push_str(&format!(
                "{},{},{},{}\n",
                index + 1,
                quote(event.barcode()),
                quote(event.format().as_str()),
                quote(event.timestamp()),
            ));
        }

        if rows == 0 {
            return Err(ExportError::Empty);
        }

        Ok(CsvExport {
            filename: filename_for(exported_at),
            contents,
            rows,
        })
    }

    /// Renders the whole store.
    pub fn from_store(
        store: &ResultStore,
        exported_at: DateTime<Utc>,
    ) -> Result<Self, ExportError> {
        Self::render(store.events(), exported_at)
    }
}

/// `barcodes_<epoch-millis>.csv`
pub fn filename_for(exported_at: DateTime<Utc>) -> String {
    format!("barcodes_{}.csv", exported_at.timestamp_millis())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::Locale;
    use crate::types::Symbology;
    use chrono::TimeZone;

    fn store_with(codes: &[&str]) -> ResultStore {
        let mut store = ResultStore::new();
        for code in codes {
            store
                .append(ScanEvent::new(*code, Symbology::Code128, Locale::Vi).unwrap())
                .unwrap();
        }
        store
    }

    fn export_time() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_760_000_000_123).unwrap()
    }

    #[test]
    fn test_empty_store_is_refused() {
        let store = ResultStore::new();
        assert_eq!(
            CsvExport::from_store(&store, export_time()),
            Err(ExportError::Empty)
        );
    }

    #[test]
    fn test_n_events_give_n_plus_one_lines() {
        let store = store_with(&["A", "B", "C", "B"]);
        let export = CsvExport::from_store(&store, export_time()).unwrap();

        let lines: Vec<&str> = export.contents.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(export.rows, 4);
    }

    #[test]
    fn test_rows_are_numbered_from_most_recent() {
        let store = store_with(&["OLDEST", "MIDDLE", "NEWEST"]);
        let export = CsvExport::from_store(&store, export_time()).unwrap();

        let rows: Vec<&str> = export.contents.lines().skip(1).collect();
        assert!(rows[0].starts_with("1,\"NEWEST\",\"CODE_128\","));
        assert!(rows[1].starts_with("2,\"MIDDLE\","));
        assert!(rows[2].starts_with("3,\"OLDEST\","));

        for (i, row) in rows.iter().enumerate() {
            let first = row.split(',').next().unwrap();
            assert_eq!(first, (i + 1).to_string());
        }
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let store = store_with(&["say \"hi\""]);
        let export = CsvExport::from_store(&store, export_time()).unwrap();
        assert!(export.contents.contains("1,\"say \"\"hi\"\"\","));
    }

    #[test]
    fn test_filename_uses_epoch_millis() {
        let store = store_with(&["A"]);
        let export = CsvExport::from_store(&store, export_time()).unwrap();
        assert_eq!(export.filename, "barcodes_1760000000123.csv");
    }

    #[test]
    fn test_contents_end_with_newline() {
        let store = store_with(&["A"]);
        let export = CsvExport::from_store(&store, export_time()).unwrap();
        assert!(export.contents.ends_with('\n'));
    }
}
