//! Quote source backed by the 0x swap API price endpoint

use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use crate::domain::entities::{QuoteRequest, Token};
use crate::domain::repositories::QuoteSource;
use crate::infrastructure::config::SwapConfig;
use crate::shared::constants::ZEROEX_NATIVE_TOKEN;
use crate::shared::error::SwapError;
use crate::shared::types::U256;

const PRICE_PATH: &str = "swap/permit2/price";
const API_VERSION: &str = "v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    #[serde(default)]
    liquidity_available: Option<bool>,
    #[serde(default)]
    buy_amount: Option<String>,
}

pub struct ZeroExQuoteSource {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl ZeroExQuoteSource {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, SwapError> {
        let endpoint = format!("{}/{}", base_url.trim_end_matches('/'), PRICE_PATH);
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| SwapError::config(format!("Invalid quote API url {}: {}", base_url, e)))?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &SwapConfig) -> Result<Self, SwapError> {
        Self::new(&config.quote_api_url, config.quote_api_key.clone())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Price request URL for `request`
    pub fn price_url(&self, request: &QuoteRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("chainId", &request.chain_id.to_string())
            .append_pair("sellToken", &token_param(&request.from_token))
            .append_pair("buyToken", &token_param(&request.to_token))
            .append_pair("sellAmount", &request.amount_in.to_string());
        url
    }
}

#[async_trait]
impl QuoteSource for ZeroExQuoteSource {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<U256, SwapError> {
        let url = self.price_url(request);
        log::debug!("GET {}", url);

        let mut builder = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header("0x-version", API_VERSION);
        if let Some(api_key) = &self.api_key {
            let mut header = HeaderValue::from_str(api_key)?;
            header.set_sensitive(true);
            builder = builder.header("0x-api-key", header);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        parse_price_response(status, &body)
    }
}

/// The price API addresses the native coin with a placeholder instead of zero
fn token_param(token: &Token) -> String {
    if token.is_native() {
        ZEROEX_NATIVE_TOKEN.to_string()
    } else {
        format!("{:?}", token.address)
    }
}

fn parse_price_response(status: StatusCode, body: &str) -> Result<U256, SwapError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SwapError::rate_limited("Quote API rate limit reached"));
    }
    if !status.is_success() {
        return Err(SwapError::network(format!("Quote API returned {}: {}", status, body)));
    }

    let price: PriceResponse = serde_json::from_str(body)
        .map_err(|e| SwapError::quote_unavailable(format!("Malformed quote response: {}", e)))?;
    if price.liquidity_available == Some(false) {
        return Err(SwapError::quote_unavailable("No liquidity for this pair"));
    }

    let buy_amount = price
        .buy_amount
        .ok_or_else(|| SwapError::quote_unavailable("Quote response has no buyAmount"))?;
    U256::from_dec_str(&buy_amount)
        .map_err(|e| SwapError::quote_unavailable(format!("Invalid buyAmount {}: {}", buy_amount, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::Address;

    fn request() -> QuoteRequest {
        QuoteRequest {
            chain_id: 8453,
            from_token: Token::new("ETH", "Ethereum", Address::zero(), 18).unwrap(),
            to_token: Token::new("USDC", "USD Coin", Address::repeat_byte(0x83), 6).unwrap(),
            amount_in: U256::exp10(18),
        }
    }

    #[test]
    fn test_price_url() {
        let source = ZeroExQuoteSource::new("https://api.0x.org/", None).unwrap();
        let url = source.price_url(&request());

        assert_eq!(url.path(), "/swap/permit2/price");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("chainId".to_string(), "8453".to_string())));
        assert!(query.contains(&("sellToken".to_string(), ZEROEX_NATIVE_TOKEN.to_string())));
        assert!(query.contains(&(
            "buyToken".to_string(),
            "0x8383838383838383838383838383838383838383".to_string()
        )));
        assert!(query.contains(&("sellAmount".to_string(), "1000000000000000000".to_string())));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ZeroExQuoteSource::new("not a url", None),
            Err(SwapError::Config(_))
        ));
    }

    #[test]
    fn test_parse_buy_amount() {
        let body = r#"{"liquidityAvailable":true,"buyAmount":"2512345678","sellAmount":"1000000000000000000"}"#;
        let amount = parse_price_response(StatusCode::OK, body).unwrap();
        assert_eq!(amount, U256::from(2_512_345_678u64));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_price_response(StatusCode::TOO_MANY_REQUESTS, ""),
            Err(SwapError::RateLimited(_))
        ));
        assert!(matches!(
            parse_price_response(StatusCode::OK, r#"{"liquidityAvailable":false}"#),
            Err(SwapError::QuoteUnavailable(_))
        ));
        assert!(matches!(
            parse_price_response(StatusCode::BAD_GATEWAY, "upstream"),
            Err(SwapError::Network(_))
        ));

        let err = parse_price_response(StatusCode::OK, r#"{"buyAmount":"1.5"}"#).unwrap_err();
        assert!(err.is_transient());
    }
}
