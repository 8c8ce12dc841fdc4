//! # Customer Commands
//!
//! Looking up a customer by code, either typed or scanned.
//!
//! ## Check-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkin                                                                │
//! │                                                                         │
//! │  ScanSession::scan_once(timeout)                                        │
//! │     │  camera on, first accepted code, camera off                       │
//! │     ▼                                                                   │
//! │  CustomerDirectory::find_by_code(code)                                  │
//! │     │  GET {api_url}/api/customer/code/{code}                           │
//! │     ▼                                                                   │
//! │  CustomerFound { name }  or  LookupFailed                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scanned customer code is not added to the result list.

use std::sync::Arc;
use std::time::Duration;

use barscan_core::Notice;
use barscan_lookup::{Customer, CustomerClient, CustomerDirectory};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::notifier::{Notifier, SessionNotices};
use crate::state::{ConfigState, DeviceState};

/// A resolved check-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinReport {
    pub code: String,
    pub customer: Customer,
}

/// Builds the HTTP directory client from the lookup settings.
pub fn customer_client(config: &ConfigState) -> Result<CustomerClient, ApiError> {
    let settings = &config.config().lookup;
    Ok(CustomerClient::new(
        &settings.api_url,
        config.config().lookup_timeout(),
    )?)
}

/// Looks up `code` and announces the result.
pub async fn lookup_customer(
    directory: &dyn CustomerDirectory,
    notifier: &dyn Notifier,
    code: &str,
) -> Result<Customer, ApiError> {
    debug!(%code, "lookup_customer command");

    match directory.find_by_code(code).await {
        Ok(customer) => {
            notifier.notify(&Notice::CustomerFound {
                name: customer.name.clone(),
            });
            Ok(customer)
        }
        Err(e) => {
            notifier.notify(&e.notice());
            Err(e.into())
        }
    }
}

/// Scans one customer code, then looks it up.
///
/// ## Errors
/// - Camera failures and `TIMEOUT` (notice already shown)
/// - Lookup failures (`LookupFailed` notice shown)
pub async fn checkin(
    config: &ConfigState,
    devices: &DeviceState,
    directory: &dyn CustomerDirectory,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
) -> Result<CheckinReport, ApiError> {
    let emitter = Arc::new(SessionNotices::new(notifier.clone()));
    let mut session = devices.session(config.session_config(), emitter);

    info!(?timeout, "Waiting for a customer code");
    let event = session.scan_once(timeout).await?;
    let code = event.barcode().to_string();

    let customer = lookup_customer(directory, notifier.as_ref(), &code).await?;
    Ok(CheckinReport { code, customer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use crate::notifier::RecordingNotifier;
    use async_trait::async_trait;
    use barscan_capture::fake::{ScriptedCamera, ScriptedDecoderFactory};
    use barscan_lookup::{LookupError, LookupResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Directory backed by a map; records every code it was asked for.
    #[derive(Default)]
    struct MapDirectory {
        customers: HashMap<String, String>,
        asked: Mutex<Vec<String>>,
    }

    impl MapDirectory {
        fn with(code: &str, name: &str) -> Self {
            MapDirectory {
                customers: [(code.to_string(), name.to_string())].into_iter().collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CustomerDirectory for MapDirectory {
        async fn find_by_code(&self, code: &str) -> LookupResult<Customer> {
            self.asked.lock().unwrap().push(code.to_string());
            match self.customers.get(code) {
                Some(name) => Ok(Customer {
                    name: name.clone(),
                    extra: Default::default(),
                }),
                None => Err(LookupError::Status { status: 404 }),
            }
        }
    }

    fn devices(camera: &ScriptedCamera) -> DeviceState {
        DeviceState::new(
            Arc::new(camera.clone()),
            Arc::new(ScriptedDecoderFactory::new()),
        )
    }

    #[tokio::test]
    async fn test_lookup_found_and_missing() {
        let directory = MapDirectory::with("KH-0042", "Nguyễn Văn A");
        let notifier = RecordingNotifier::new();

        let customer = lookup_customer(&directory, &notifier, "KH-0042").await.unwrap();
        assert_eq!(customer.name, "Nguyễn Văn A");

        let err = lookup_customer(&directory, &notifier, "KH-9999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(
            notifier.notices(),
            vec![
                Notice::CustomerFound {
                    name: "Nguyễn Văn A".into()
                },
                Notice::LookupFailed,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkin_scans_then_looks_up() {
        let camera = ScriptedCamera::timeline([(250, "KH-0042")]);
        let directory = MapDirectory::with("KH-0042", "Trần Thị B");
        let notifier = Arc::new(RecordingNotifier::new());

        let report = checkin(
            &ConfigState::default(),
            &devices(&camera),
            &directory,
            notifier.clone(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(report.code, "KH-0042");
        assert_eq!(report.customer.name, "Trần Thị B");
        assert_eq!(*directory.asked.lock().unwrap(), vec!["KH-0042".to_string()]);
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(
            notifier.notices(),
            vec![Notice::CustomerFound {
                name: "Trần Thị B".into()
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkin_timeout_skips_lookup() {
        let camera = ScriptedCamera::blank();
        let directory = MapDirectory::default();
        let notifier = Arc::new(RecordingNotifier::new());

        let err = checkin(
            &ConfigState::default(),
            &devices(&camera),
            &directory,
            notifier.clone(),
            Duration::from_secs(3),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Timeout);
        assert!(directory.asked.lock().unwrap().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::ScanTimeout]);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[test]
    fn test_client_uses_configured_url() {
        let mut config = AppConfig::default();
        config.lookup.api_url = "https://crm.example.com/v2".into();

        let client = customer_client(&ConfigState::new(config)).unwrap();
        assert_eq!(
            client.url_for("KH-0042").unwrap().as_str(),
            "https://crm.example.com/v2/api/customer/code/KH-0042"
        );
    }
}
