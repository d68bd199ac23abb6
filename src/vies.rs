//! EU VIES REST client for VAT registration checks.
//!
//! VIES is an external collaborator: the engine never calls it during rate
//! determination, which stays offline and deterministic. Hosts may use this
//! client before accepting a buyer's VAT ID, then feed the outcome into a
//! [`TaxIdValidator`](crate::vat::TaxIdValidator) of their own.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::vat::validate_vat_format;

/// Result of a VIES VAT number check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViesResult {
    /// Whether the VAT number is currently registered.
    pub valid: bool,
    /// Date of the request (YYYY-MM-DD).
    pub request_date: Option<String>,
    /// Registered company name (if disclosed).
    pub name: Option<String>,
    /// Registered address (if disclosed).
    pub address: Option<String>,
}

/// Error from a VIES lookup.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ViesError {
    /// The VAT ID failed local format validation; no request was sent.
    Format(String),
    /// Network or HTTP error.
    Network(String),
    /// VIES returned an error (e.g. member state unavailable).
    ApiError(String),
    /// Failed to parse the response.
    ParseError(String),
}

impl fmt::Display for ViesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => write!(f, "VIES format error: {e}"),
            Self::Network(e) => write!(f, "VIES network error: {e}"),
            Self::ApiError(e) => write!(f, "VIES API error: {e}"),
            Self::ParseError(e) => write!(f, "VIES parse error: {e}"),
        }
    }
}

impl std::error::Error for ViesError {}

pub const VIES_URL: &str = "https://ec.europa.eu/taxation_customs/vies/rest-api/check-vat-number";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViesApiResponse {
    valid: Option<bool>,
    request_date: Option<String>,
    name: Option<String>,
    address: Option<String>,
    error_wrappers: Option<Vec<ViesErrorWrapper>>,
}

#[derive(Debug, Deserialize)]
struct ViesErrorWrapper {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViesRequest {
    country_code: String,
    vat_number: String,
}

/// VIES HTTP client with a configurable endpoint.
#[derive(Debug, Clone)]
pub struct ViesClient {
    endpoint: String,
    timeout: Duration,
}

impl Default for ViesClient {
    fn default() -> Self {
        Self {
            endpoint: VIES_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ViesClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check a full VAT ID (prefix included, e.g. "FR12345678901").
    ///
    /// The ID is format-checked locally first; malformed IDs never reach
    /// the network.
    pub async fn check(&self, vat_id: &str) -> Result<ViesResult, ViesError> {
        let id = validate_vat_format(vat_id).map_err(|e| ViesError::Format(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ViesError::Network(e.to_string()))?;

        let req = ViesRequest {
            country_code: id.prefix.clone(),
            vat_number: id.number.clone(),
        };
        debug!(prefix = %id.prefix, "querying VIES");

        let resp = client
            .post(&self.endpoint)
            .json(&req)
            .send()
            .await
            .map_err(|e| ViesError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ViesError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(%status, "VIES request failed");
            return Err(ViesError::ApiError(format!("HTTP {status}: {body}")));
        }

        parse_response(&body)
    }
}

/// Check a VAT ID against the public VIES endpoint.
pub async fn check_vies(vat_id: &str) -> Result<ViesResult, ViesError> {
    ViesClient::default().check(vat_id).await
}

fn parse_response(body: &str) -> Result<ViesResult, ViesError> {
    let api_resp: ViesApiResponse =
        serde_json::from_str(body).map_err(|e| ViesError::ParseError(e.to_string()))?;

    if let Some(err) = api_resp.error_wrappers.as_ref().and_then(|e| e.first()) {
        let msg = err
            .message
            .clone()
            .or_else(|| err.error.clone())
            .unwrap_or_else(|| "unknown error".into());
        return Err(ViesError::ApiError(msg));
    }

    // VIES masks undisclosed fields as "---".
    let disclosed = |v: Option<String>| v.filter(|s| s != "---" && !s.is_empty());
    Ok(ViesResult {
        valid: api_resp.valid.unwrap_or(false),
        request_date: api_resp.request_date,
        name: disclosed(api_resp.name),
        address: disclosed(api_resp.address),
    })
}
