//! # Notices
//!
//! Short, transient messages shown to the operator (the "toasts").
//!
//! Every outcome the operator should hear about is a [`Notice`] variant;
//! rendering it to text is a pure function of the variant and a [`Locale`].
//! Notices are never persisted.

use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Locale
// =============================================================================

/// Display language for notices and timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Vietnamese (default, the operators' language).
    #[default]
    Vi,
    /// Japanese.
    Ja,
    /// English.
    En,
}

impl Locale {
    /// Renders a timestamp the way the locale's wall clock reads.
    ///
    /// | Locale | Example |
    /// |--------|---------|
    /// | `vi` | `09:30:05 14/10/2026` |
    /// | `ja` | `2026/10/14 09:30:05` |
    /// | `en` | `10/14/2026, 09:30:05` |
    ///
    /// Every locale uses a zero-padded 24-hour clock.
    pub fn format_timestamp<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let pattern = match self {
            Locale::Vi => "%H:%M:%S %d/%m/%Y",
            Locale::Ja => "%Y/%m/%d %H:%M:%S",
            Locale::En => "%m/%d/%Y, %H:%M:%S",
        };
        at.format(pattern).to_string()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    /// Accepts bare codes and region-tagged ones (`vi-VN`, `ja_JP`, `en-US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match lang.as_str() {
            "vi" => Ok(Locale::Vi),
            "ja" | "jp" => Ok(Locale::Ja),
            "en" => Ok(Locale::En),
            _ => Err(ValidationError::NotAllowed {
                field: "locale".to_string(),
                allowed: vec!["vi".into(), "ja".into(), "en".into()],
            }),
        }
    }
}

// =============================================================================
// Severity
// =============================================================================

/// How a notice should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

// =============================================================================
// Notice
// =============================================================================

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A scan was accepted into the result list.
    ScanSuccess { code: String },
    ResultsCleared,
    ExportDone { filename: String },
    ExportEmpty,
    PermissionDenied,
    DeviceNotFound,
    /// No capture facility at all on this machine.
    Unsupported,
    /// Any other camera failure.
    CameraError { detail: String },
    DecoderInit,
    /// Single-shot scan gave up waiting.
    ScanTimeout,
    LookupFailed,
    CustomerFound { name: String },
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::ScanSuccess { .. }
            | Notice::ExportDone { .. }
            | Notice::CustomerFound { .. } => Severity::Success,
            Notice::ResultsCleared => Severity::Info,
            Notice::ExportEmpty | Notice::ScanTimeout => Severity::Warning,
            Notice::PermissionDenied
            | Notice::DeviceNotFound
            | Notice::Unsupported
            | Notice::CameraError { .. }
            | Notice::DecoderInit
            | Notice::LookupFailed => Severity::Error,
        }
    }

    /// Localized text.
    pub fn text(&self, locale: Locale) -> String {
        use Locale::*;

        match (self, locale) {
            (Notice::ScanSuccess { code }, Vi) => format!("Scan thành công: {code}"),
            (Notice::ScanSuccess { code }, Ja) => format!("スキャン成功: {code}"),
            (Notice::ScanSuccess { code }, En) => format!("Scanned: {code}"),

            (Notice::ResultsCleared, Vi) => "Đã xóa tất cả kết quả".into(),
            (Notice::ResultsCleared, Ja) => "すべての結果を削除しました".into(),
            (Notice::ResultsCleared, En) => "All results cleared".into(),

            (Notice::ExportDone { filename }, Vi) => format!("Đã xuất file CSV: {filename}"),
            (Notice::ExportDone { filename }, Ja) => format!("CSVファイルを出力しました: {filename}"),
            (Notice::ExportDone { filename }, En) => format!("CSV file exported: {filename}"),

            (Notice::ExportEmpty, Vi) => "Không có dữ liệu để xuất".into(),
            (Notice::ExportEmpty, Ja) => "出力するデータがありません".into(),
            (Notice::ExportEmpty, En) => "No data to export".into(),

            (Notice::PermissionDenied, Vi) => "Vui lòng cấp quyền truy cập camera".into(),
            (Notice::PermissionDenied, Ja) => "カメラへのアクセスを許可してください".into(),
            (Notice::PermissionDenied, En) => "Please allow camera access".into(),

            (Notice::DeviceNotFound, Vi) => "Không tìm thấy camera".into(),
            (Notice::DeviceNotFound, Ja) => "カメラが見つかりません".into(),
            (Notice::DeviceNotFound, En) => "No camera found".into(),

            (Notice::Unsupported, Vi) => "Thiết bị của bạn không hỗ trợ camera".into(),
            (Notice::Unsupported, Ja) => "このデバイスはカメラに対応していません".into(),
            (Notice::Unsupported, En) => "Camera capture is not supported on this device".into(),

            (Notice::CameraError { detail }, Vi) => format!("Lỗi khi bật camera: {detail}"),
            (Notice::CameraError { detail }, Ja) => format!("カメラの起動エラー: {detail}"),
            (Notice::CameraError { detail }, En) => format!("Failed to start camera: {detail}"),

            (Notice::DecoderInit, Vi) => "Không thể khởi tạo trình quét mã".into(),
            (Notice::DecoderInit, Ja) => "スキャナーを初期化できません".into(),
            (Notice::DecoderInit, En) => "Could not initialize the scanner".into(),

            (Notice::ScanTimeout, Vi) => "Hết thời gian quét mã".into(),
            (Notice::ScanTimeout, Ja) => "スキャンがタイムアウトしました".into(),
            (Notice::ScanTimeout, En) => "Scan timed out".into(),

            (Notice::LookupFailed, Vi) => "Không thể tra cứu thông tin khách hàng".into(),
            (Notice::LookupFailed, Ja) => "顧客情報を取得できませんでした".into(),
            (Notice::LookupFailed, En) => "Customer lookup failed".into(),

            (Notice::CustomerFound { name }, Vi) => format!("Khách hàng: {name}"),
            (Notice::CustomerFound { name }, Ja) => format!("お客様: {name}"),
            (Notice::CustomerFound { name }, En) => format!("Customer: {name}"),
        }
    }
}
