//! Input validation for the transfer and contract forms.

use std::str::FromStr;

use alloy::primitives::{Address, U256};

use crate::error::DappError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressValidation {
    Valid,
    ChecksumMismatch,
    Invalid,
}

/// Classify an address string; all-lowercase and all-uppercase input skip
/// the EIP-55 check.
pub fn validate_address(input: &str) -> AddressValidation {
    let trimmed = input.trim();
    let Some(body) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    else {
        return AddressValidation::Invalid;
    };
    let Ok(address) = Address::from_str(trimmed) else {
        return AddressValidation::Invalid;
    };

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return AddressValidation::Valid;
    }

    let checksummed = address.to_checksum(None);
    if checksummed[2..] == *body {
        AddressValidation::Valid
    } else {
        AddressValidation::ChecksumMismatch
    }
}

pub fn parse_address(input: &str) -> Result<Address, DappError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DappError::invalid_address(input, "address is required"));
    }
    match validate_address(trimmed) {
        AddressValidation::Valid => Address::from_str(trimmed)
            .map_err(|e| DappError::invalid_address(input, e)),
        AddressValidation::ChecksumMismatch => Err(DappError::invalid_address(
            input,
            "EIP-55 checksum mismatch",
        )),
        AddressValidation::Invalid => Err(DappError::invalid_address(
            input,
            "expected 0x followed by 40 hex characters",
        )),
    }
}

/// Whole-token `uint256` amount as typed into the mint form.
pub fn parse_token_amount(input: &str) -> Result<U256, DappError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DappError::invalid_amount(input, "amount is required"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DappError::invalid_amount(input, "expected a decimal integer"));
    }
    U256::from_str_radix(trimmed, 10).map_err(|e| DappError::invalid_amount(input, e))
}
