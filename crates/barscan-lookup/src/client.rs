//! HTTP client for the customer directory.

use std::time::Duration;

use async_trait::async_trait;
use barscan_core::validation::validate_lookup_code;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LookupError, LookupResult};

/// A customer record. Only `name` is interpreted; everything else the
/// service sends is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Anything that can resolve a customer code.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn find_by_code(&self, code: &str) -> LookupResult<Customer>;
}

/// `reqwest`-backed directory client.
#[derive(Debug, Clone)]
pub struct CustomerClient {
    base: Url,
    http: reqwest::Client,
}

impl CustomerClient {
    /// Creates a client for `api_url` (e.g. `https://crm.example.com`).
    ///
    /// ## Errors
    /// `InvalidUrl` unless `api_url` is an absolute http(s) URL.
    pub fn new(api_url: &str, timeout: Duration) -> LookupResult<Self> {
        let base = Url::parse(api_url)
            .map_err(|e| LookupError::InvalidUrl(format!("{api_url}: {e}")))?;

        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(LookupError::InvalidUrl(format!(
                "{api_url}: expected an http:// or https:// URL"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;

        Ok(CustomerClient { base, http })
    }

    /// `{base}/api/customer/code/{code}` with `code` encoded as one segment.
    pub fn url_for(&self, code: &str) -> LookupResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| LookupError::InvalidUrl(self.base.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["api", "customer", "code", code]);
        }
        Ok(url)
    }
}

#[async_trait]
impl CustomerDirectory for CustomerClient {
    async fn find_by_code(&self, code: &str) -> LookupResult<Customer> {
        let code = validate_lookup_code(code)?;
        let url = self.url_for(&code)?;

        debug!(%url, "Looking up customer");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%code, status = status.as_u16(), "Customer lookup rejected");
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let customer: Customer = serde_json::from_slice(&body)?;

        info!(%code, name = %customer.name, "Customer found");
        Ok(customer)
    }
}
