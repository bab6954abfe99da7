use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use gas_core::traits::price_source::PriceSource;
use gas_core::TrackerError;

const BASE_URL: &str = "https://api.etherscan.io/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GasResponse {
    status: String,
    message: String,
    result: GasResult,
}

#[derive(Debug, Deserialize)]
struct GasResult {
    #[serde(rename = "ProposeGasPrice")]
    propose_gas_price: String,
}

/// Medium ("propose") gas price from the Etherscan gas oracle.
pub struct EtherscanSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl EtherscanSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::fetch(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }
}

impl PriceSource for EtherscanSource {
    fn fetch_current_price(&self) -> Result<u64, TrackerError> {
        let rsp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "gastracker"),
                ("action", "gasoracle"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .map_err(|e| TrackerError::fetch(format!("while requesting etherscan API: {}", e)))?;

        let status = rsp.status();
        let body = rsp
            .text()
            .map_err(|e| TrackerError::fetch(format!("while reading response body: {}", e)))?;
        debug!("GET {} -> status={} bytes={}", self.base_url, status.as_u16(), body.len());

        if !status.is_success() {
            return Err(TrackerError::fetch(format!("response error: {} {}", status, body)));
        }
        parse_medium_gas(&body)
    }
}

/// Pull the propose price out of a gas oracle response body.
pub fn parse_medium_gas(body: &str) -> Result<u64, TrackerError> {
    let gas: GasResponse = serde_json::from_str(body)
        .map_err(|e| TrackerError::fetch(format!("while unmarshalling response body: {}", e)))?;

    if gas.status != "1" || gas.message != "OK" {
        return Err(TrackerError::fetch(format!(
            "error response body: {} {}",
            gas.status, gas.message
        )));
    }

    gas.result.propose_gas_price.trim().parse::<u64>().map_err(|e| {
        TrackerError::fetch(format!(
            "while parsing gas price {}: {}",
            gas.result.propose_gas_price, e
        ))
    })
}
