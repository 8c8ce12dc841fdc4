//! # Export Commands
//!
//! Writing the result list to a CSV file in the export directory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  export_csv                                                             │
//! │                                                                         │
//! │  ResultsState ──► CsvExport::from_store(now)                            │
//! │                         │                                               │
//! │            ┌────────────┴─────────────┐                                 │
//! │            ▼                          ▼                                 │
//! │     Err(Empty)                 Ok(CsvExport)                            │
//! │     ExportEmpty (warning)      write {dir}/barcodes_<millis>.csv        │
//! │                                ExportDone { filename } (success)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use barscan_core::{CsvExport, ExportError, Notice};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::commands::results::clear_results;
use crate::error::ApiError;
use crate::notifier::Notifier;
use crate::state::{ConfigState, ResultsState};

/// Where an export landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
}

/// Exports every result, stamped with the current time.
pub fn export_csv(
    results: &ResultsState,
    config: &ConfigState,
    notifier: &dyn Notifier,
) -> Result<ExportReport, ApiError> {
    export_csv_at(results, config, notifier, Utc::now())
}

/// Exports every result as of `exported_at`.
///
/// ## Errors
/// - `EXPORT_EMPTY` when there is nothing to export (a warning notice is shown)
/// - I/O errors from creating the directory or writing the file
pub fn export_csv_at(
    results: &ResultsState,
    config: &ConfigState,
    notifier: &dyn Notifier,
    exported_at: DateTime<Utc>,
) -> Result<ExportReport, ApiError> {
    let export = match results.with_store(|store| CsvExport::from_store(store, exported_at)) {
        Ok(export) => export,
        Err(ExportError::Empty) => {
            warn!("Export requested with no results");
            notifier.notify(&Notice::ExportEmpty);
            return Err(ExportError::Empty.into());
        }
    };

    let dir = config.export_dir();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(&export.filename);
    std::fs::write(&path, export.contents.as_bytes())?;

    info!(?path, rows = export.rows, "CSV exported");
    notifier.notify(&Notice::ExportDone {
        filename: export.filename,
    });

    Ok(ExportReport {
        path,
        rows: export.rows,
    })
}

/// Exports every result, then clears the list if `clear` is set.
///
/// The list is only cleared once the file is written; a failed or empty
/// export leaves it as it was.
pub fn export_and_clear(
    results: &ResultsState,
    config: &ConfigState,
    notifier: &dyn Notifier,
    clear: bool,
) -> Result<ExportReport, ApiError> {
    let report = export_csv(results, config, notifier)?;
    if clear {
        clear_results(results, notifier);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use crate::notifier::RecordingNotifier;
    use barscan_core::{Locale, ScanEvent, Statistics, Symbology, CSV_HEADER};
    use chrono::TimeZone;

    fn config_in(dir: &std::path::Path) -> ConfigState {
        let mut config = AppConfig::default();
        config.export.directory = dir.join("downloads");
        ConfigState::new(config)
    }

    #[test]
    fn test_export_writes_file_and_notifies() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let results = ResultsState::new();
        let quiet = RecordingNotifier::new();
        for (code, format) in [("ABC123", Symbology::Code128), ("hello", Symbology::QrCode)] {
            let event = ScanEvent::new(code, format, Locale::Vi).unwrap();
            results.record(event, &quiet).unwrap();
        }

        let notifier = RecordingNotifier::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let report = export_csv_at(&results, &config, &notifier, at).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(
            report.path,
            tmp.path().join("downloads").join("barcodes_1700000000123.csv")
        );

        let contents = std::fs::read_to_string(&report.path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("1,\"hello\",\"QR_CODE\","));
        assert!(lines[2].starts_with("2,\"ABC123\",\"CODE_128\","));

        assert_eq!(
            notifier.notices(),
            vec![Notice::ExportDone {
                filename: "barcodes_1700000000123.csv".into()
            }]
        );
    }

    #[test]
    fn test_empty_export_warns_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let notifier = RecordingNotifier::new();

        let err = export_csv(&ResultsState::new(), &config, &notifier).unwrap_err();

        assert_eq!(err.code, ErrorCode::ExportEmpty);
        assert_eq!(notifier.notices(), vec![Notice::ExportEmpty]);
        assert!(!tmp.path().join("downloads").exists());
    }

    #[test]
    fn test_export_and_clear_empties_the_list() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let results = ResultsState::new();
        let quiet = RecordingNotifier::new();
        let event = ScanEvent::new("ABC123", Symbology::Code128, Locale::En).unwrap();
        results.record(event, &quiet).unwrap();

        let notifier = RecordingNotifier::new();
        let report = export_and_clear(&results, &config, &notifier, true).unwrap();

        assert_eq!(report.rows, 1);
        assert!(report.path.exists());
        assert_eq!(results.statistics(), Statistics::default());

        let notices = notifier.notices();
        assert!(matches!(notices[0], Notice::ExportDone { .. }));
        assert_eq!(notices[1], Notice::ResultsCleared);
    }

    #[test]
    fn test_export_and_clear_keeps_results_when_not_asked() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let results = ResultsState::new();
        let quiet = RecordingNotifier::new();
        let event = ScanEvent::new("ABC123", Symbology::Code128, Locale::En).unwrap();
        results.record(event, &quiet).unwrap();

        export_and_clear(&results, &config, &RecordingNotifier::new(), false).unwrap();

        assert_eq!(results.statistics(), Statistics { total: 1, unique: 1 });
    }

    #[test]
    fn test_empty_export_does_not_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let notifier = RecordingNotifier::new();

        let err = export_and_clear(&ResultsState::new(), &config, &notifier, true).unwrap_err();

        assert_eq!(err.code, ErrorCode::ExportEmpty);
        assert_eq!(notifier.notices(), vec![Notice::ExportEmpty]);
    }
}
