use anyhow::Context;
use miniswap_core::{SwapConfig, TokenRegistry};

fn main() -> anyhow::Result<()> {
    miniswap_core::init();

    let config = SwapConfig::load().context("Failed to load configuration")?;
    let registry = TokenRegistry::builtin()
        .and_then(|r| r.with_default_chain(config.default_chain_id))
        .context("Failed to build token registry")?;

    println!("MiniSwap Core Configuration:\n");
    println!("  Default Chain ID: {}", config.default_chain_id);
    println!("  Quote Debounce: {} ms", config.quote_debounce_ms);
    println!("  Approval Mode: {:?}", config.approval_mode);
    println!("  Quote API URL: {}", config.quote_api_url);
    println!(
        "  Quote API Key: {}",
        if config.quote_api_key.is_some() { "(set)" } else { "(not set)" }
    );
    println!("  Handoff URL: {}", config.handoff_url);

    println!("\nSupported Chains:\n");
    for chain in registry.chains() {
        let symbols: Vec<&str> = registry.tokens_for(chain.id).iter().map(|t| t.symbol.as_str()).collect();
        println!("  {} ({}, slug {})", chain.display_name, chain.id, chain.routing_slug);
        println!("    RPC URL: {}", config.rpc_url_for(chain));
        println!("    Spender: {:?}", chain.spender);
        println!("    Tokens: {}", symbols.join(", "));
    }

    Ok(())
}
