//! FFI bindings for the swap core
//!
//! C-compatible entry points for hosts that keep their own wallet and network
//! plumbing and only want the decision logic. All payloads are JSON strings.
//! Every returned result must be released with [`miniswap_free_result`].

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use serde::Deserialize;
use crate::core::orchestrator::{evaluate, OrchestratorInputs};
use crate::core::quote::QuoteState;
use crate::core::registry::TokenRegistry;
use crate::domain::entities::{AllowanceSnapshot, SwapRequest, TrackedTransaction};
use crate::infrastructure::handoff::handoff_url;
use crate::shared::constants::DEFAULT_HANDOFF_URL;
use crate::shared::error::SwapError;
use crate::shared::types::{ApprovalMode, ChainId, WalletSnapshot};

const MAX_INPUT_LENGTH: usize = 64 * 1024;

const ERR_INVALID_INPUT: i32 = 1;
const ERR_INVALID_JSON: i32 = 2;
const ERR_UNSUPPORTED_TOKEN: i32 = 3;
const ERR_REGISTRY: i32 = 4;
const ERR_INVALID_URL: i32 = 5;
const ERR_STRING_CONVERSION: i32 = 15;

/// FFI result wrapper
#[repr(C)]
pub struct SwapFfiResult {
    success: bool,
    data: *mut c_char,
    error_code: i32,
}

impl SwapFfiResult {
    fn success(data: String) -> Self {
        match CString::new(data) {
            Ok(c_string) => Self {
                success: true,
                data: c_string.into_raw(),
                error_code: 0,
            },
            Err(_) => Self::error(ERR_STRING_CONVERSION),
        }
    }

    fn error(error_code: i32) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error_code,
        }
    }
}

/// Orchestrator inputs as sent by the host
#[derive(Debug, Deserialize)]
pub struct EvaluationInput {
    pub wallet: WalletSnapshot,
    pub chain_id: ChainId,
    pub from_symbol: String,
    pub to_symbol: String,
    #[serde(default)]
    pub amount_in: String,
    pub quote: QuoteState,
    pub latest_quote_seq: u64,
    #[serde(default)]
    pub allowance: Option<AllowanceSnapshot>,
    #[serde(default)]
    pub allowance_unavailable: bool,
    #[serde(default)]
    pub approval: Option<TrackedTransaction>,
    #[serde(default)]
    pub swap: Option<TrackedTransaction>,
    #[serde(default)]
    pub approval_mode: ApprovalMode,
}

#[derive(Debug, Deserialize)]
pub struct HandoffInput {
    pub chain_id: ChainId,
    pub from_symbol: String,
    pub to_symbol: String,
    #[serde(default)]
    pub amount_in: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn read_input(input: *const c_char) -> Result<String, SwapError> {
    if input.is_null() {
        return Err(SwapError::validation("Null input pointer"));
    }

    let input_str = unsafe {
        match CStr::from_ptr(input).to_str() {
            Ok(s) => s,
            Err(_) => return Err(SwapError::validation("Invalid UTF-8 input")),
        }
    };

    if input_str.len() > MAX_INPUT_LENGTH {
        return Err(SwapError::validation("Input too long"));
    }
    if input_str.trim().is_empty() {
        return Err(SwapError::validation("Empty input"));
    }
    Ok(input_str.to_string())
}

fn error_code(error: &SwapError) -> i32 {
    match error {
        SwapError::UnsupportedToken(_) => ERR_UNSUPPORTED_TOKEN,
        SwapError::Config(_) | SwapError::UnsupportedChain(_) => ERR_REGISTRY,
        _ => ERR_INVALID_INPUT,
    }
}

/// Resolve chain and tokens the same way the swap form does.
fn resolve_request(
    registry: &TokenRegistry,
    chain_id: ChainId,
    from_symbol: &str,
    to_symbol: &str,
    amount_in: &str,
) -> Result<SwapRequest, SwapError> {
    let chain = registry.resolve_chain(chain_id);
    let from = registry.require_token(chain.id, from_symbol)?.clone();
    let to = registry.require_token(chain.id, to_symbol)?.clone();
    Ok(SwapRequest::new(chain.id, from, to, amount_in))
}

/// Evaluate the primary action for a JSON `EvaluationInput`
#[no_mangle]
pub extern "C" fn miniswap_evaluate(input_json: *const c_char) -> SwapFfiResult {
    let input = match read_input(input_json) {
        Ok(s) => s,
        Err(_) => return SwapFfiResult::error(ERR_INVALID_INPUT),
    };
    let input: EvaluationInput = match serde_json::from_str(&input) {
        Ok(input) => input,
        Err(_) => return SwapFfiResult::error(ERR_INVALID_JSON),
    };
    let registry = match TokenRegistry::builtin() {
        Ok(registry) => registry,
        Err(_) => return SwapFfiResult::error(ERR_REGISTRY),
    };
    let request = match resolve_request(
        &registry,
        input.chain_id,
        &input.from_symbol,
        &input.to_symbol,
        &input.amount_in,
    ) {
        Ok(request) => request,
        Err(e) => return SwapFfiResult::error(error_code(&e)),
    };

    let action = evaluate(&OrchestratorInputs {
        wallet: &input.wallet,
        chain: registry.resolve_chain(request.chain_id),
        request: &request,
        quote: &input.quote,
        latest_quote_seq: input.latest_quote_seq,
        allowance: input.allowance.as_ref(),
        allowance_unavailable: input.allowance_unavailable,
        approval: input.approval.as_ref(),
        swap: input.swap.as_ref(),
        approval_mode: input.approval_mode,
    });

    match serde_json::to_string(&action) {
        Ok(json) => SwapFfiResult::success(json),
        Err(_) => SwapFfiResult::error(ERR_STRING_CONVERSION),
    }
}

/// Tokens offered on `chain_id`, or on the default chain when unsupported
#[no_mangle]
pub extern "C" fn miniswap_tokens_for(chain_id: u64) -> SwapFfiResult {
    let registry = match TokenRegistry::builtin() {
        Ok(registry) => registry,
        Err(_) => return SwapFfiResult::error(ERR_REGISTRY),
    };
    match serde_json::to_string(registry.tokens_for(chain_id)) {
        Ok(json) => SwapFfiResult::success(json),
        Err(_) => SwapFfiResult::error(ERR_STRING_CONVERSION),
    }
}

/// Exchange deep link for a JSON `HandoffInput`
#[no_mangle]
pub extern "C" fn miniswap_handoff_url(input_json: *const c_char) -> SwapFfiResult {
    let input = match read_input(input_json) {
        Ok(s) => s,
        Err(_) => return SwapFfiResult::error(ERR_INVALID_INPUT),
    };
    let input: HandoffInput = match serde_json::from_str(&input) {
        Ok(input) => input,
        Err(_) => return SwapFfiResult::error(ERR_INVALID_JSON),
    };
    let registry = match TokenRegistry::builtin() {
        Ok(registry) => registry,
        Err(_) => return SwapFfiResult::error(ERR_REGISTRY),
    };
    let request = match resolve_request(
        &registry,
        input.chain_id,
        &input.from_symbol,
        &input.to_symbol,
        &input.amount_in,
    ) {
        Ok(request) => request,
        Err(e) => return SwapFfiResult::error(error_code(&e)),
    };

    let base = input.base_url.as_deref().unwrap_or(DEFAULT_HANDOFF_URL);
    match handoff_url(base, registry.resolve_chain(request.chain_id), &request) {
        Ok(url) => SwapFfiResult::success(url.to_string()),
        Err(_) => SwapFfiResult::error(ERR_INVALID_URL),
    }
}

/// Free a string returned by this library
#[no_mangle]
pub extern "C" fn miniswap_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

/// Free the data held by a result returned by this library
#[no_mangle]
pub extern "C" fn miniswap_free_result(result: *mut SwapFfiResult) {
    if !result.is_null() {
        unsafe {
            let result_ref = &mut *result;
            if !result_ref.data.is_null() {
                let _ = CString::from_raw(result_ref.data);
                result_ref.data = ptr::null_mut();
            }
        }
    }
}
