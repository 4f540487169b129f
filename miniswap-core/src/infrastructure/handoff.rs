//! Deep link into the external exchange

use reqwest::Url;
use crate::domain::entities::{Chain, SwapRequest};
use crate::shared::error::SwapError;

/// Link that opens the external exchange with the current selection prefilled
pub fn handoff_url(base: &str, chain: &Chain, request: &SwapRequest) -> Result<Url, SwapError> {
    let mut url = Url::parse(base).map_err(|e| SwapError::config(format!("Invalid handoff url {}: {}", base, e)))?;

    url.query_pairs_mut()
        .append_pair("chain", &chain.routing_slug)
        .append_pair("inputCurrency", &format!("{:?}", request.from_token.address))
        .append_pair("outputCurrency", &format!("{:?}", request.to_token.address))
        .append_pair("amount", request.amount_in.trim());
    Ok(url)
}
