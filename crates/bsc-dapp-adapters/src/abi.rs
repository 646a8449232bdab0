use std::str::FromStr;

use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{hex, Address, Bytes, B256, I256, U256};
use serde_json::Value;

use bsc_dapp_core::PortError;

/// ABI of the demo token, passed verbatim to `execute_contract`.
pub const COIN_ABI: &str = include_str!("../abi/coin.json");

/// Builds calldata for a named method of a JSON ABI.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiAdapter;

impl AbiAdapter {
    pub fn encode_call(
        &self,
        abi_json: &str,
        method: &str,
        args: &[String],
    ) -> Result<(Bytes, [u8; 4]), PortError> {
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| PortError::Validation(format!("invalid abi json: {e}")))?;
        let function = select_function(&abi, method)?;
        if function.inputs.len() != args.len() {
            return Err(PortError::Validation(format!(
                "argument count mismatch: expected {}, got {}",
                function.inputs.len(),
                args.len()
            )));
        }

        let mut dyn_args = Vec::with_capacity(args.len());
        for (input, arg) in function.inputs.iter().zip(args.iter()) {
            let ty: DynSolType = input.ty.parse().map_err(|e| {
                PortError::Validation(format!("unsupported type '{}': {e}", input.ty))
            })?;
            let value = parse_arg(arg, &ty).map_err(|e| {
                PortError::Validation(format!("arg '{}' parse failed: {e}", input.name))
            })?;
            dyn_args.push(value);
        }

        let encoded = function
            .abi_encode_input(&dyn_args)
            .map_err(|e| PortError::Validation(format!("abi encoding failed: {e}")))?;
        let selector: [u8; 4] = function.selector().into();
        if encoded.len() < 4 || encoded[0..4] != selector {
            return Err(PortError::Validation("ABI_SELECTOR_MISMATCH".to_owned()));
        }
        Ok((Bytes::from(encoded), selector))
    }
}

/// Accepts a bare name (first overload wins) or a full `name(types)` signature.
fn select_function<'a>(abi: &'a JsonAbi, method: &str) -> Result<&'a Function, PortError> {
    let (method_name, full_sig) = match method.split_once('(') {
        Some((name, _)) => (name, Some(method)),
        None => (method, None),
    };

    let candidates = abi
        .function(method_name)
        .ok_or_else(|| PortError::Validation(format!("method not found: {method_name}")))?;

    if let Some(full_sig) = full_sig {
        return candidates
            .iter()
            .find(|f| f.signature() == full_sig)
            .ok_or_else(|| PortError::Validation(format!("method signature not found: {full_sig}")));
    }

    candidates
        .first()
        .ok_or_else(|| PortError::Validation(format!("method has no overloads: {method_name}")))
}

/// Scalars are taken from the raw text; only arrays are JSON-decoded.
fn parse_arg(raw: &str, ty: &DynSolType) -> Result<DynSolValue, String> {
    let trimmed = raw.trim();
    match ty {
        DynSolType::Bool => trimmed
            .parse::<bool>()
            .map(DynSolValue::Bool)
            .map_err(|e| format!("invalid bool: {e}")),
        DynSolType::Uint(bits) => parse_uint(trimmed)
            .map(|x| DynSolValue::Uint(x, *bits))
            .map_err(|e| format!("invalid uint: {e}")),
        DynSolType::Int(bits) => I256::from_str(trimmed)
            .map(|x| DynSolValue::Int(x, *bits))
            .map_err(|e| format!("invalid int: {e}")),
        DynSolType::Address => Address::from_str(trimmed)
            .map(DynSolValue::Address)
            .map_err(|e| format!("invalid address: {e}")),
        DynSolType::FixedBytes(size) => parse_fixed_bytes(trimmed, *size),
        DynSolType::Bytes => Bytes::from_str(trimmed)
            .map(|x| DynSolValue::Bytes(x.into()))
            .map_err(|e| format!("invalid bytes: {e}")),
        DynSolType::String => Ok(DynSolValue::String(raw.to_owned())),
        DynSolType::Array(inner) => {
            let items: Vec<Value> =
                serde_json::from_str(trimmed).map_err(|e| format!("expected json array: {e}"))?;
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => parse_arg(s, inner),
                    other => parse_arg(&other.to_string(), inner),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Array)
        }
        _ => Err(format!("type {ty:?} not supported by the call builder")),
    }
}

/// `bytesN` values are left-aligned in the 32-byte word.
fn parse_fixed_bytes(raw: &str, size: usize) -> Result<DynSolValue, String> {
    let decoded = hex::decode(raw).map_err(|e| format!("invalid fixed bytes: {e}"))?;
    if decoded.len() != size || size > 32 {
        return Err(format!(
            "invalid fixed bytes: expected {size} bytes, got {}",
            decoded.len()
        ));
    }
    let mut word = B256::ZERO;
    word[..size].copy_from_slice(&decoded);
    Ok(DynSolValue::FixedBytes(word, size))
}

fn parse_uint(raw: &str) -> Result<U256, String> {
    match raw.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None => U256::from_str_radix(raw, 10).map_err(|e| e.to_string()),
    }
}
