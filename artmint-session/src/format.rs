// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Display helpers.

use alloy::primitives::{utils::format_units, Address, U256};

/// Shortens an address to its first six and last four characters, e.g. `0x1234...abcd`.
pub fn format_address(address: &Address) -> String {
    let full = format!("{address:#x}");
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Formats an 18-decimal token amount with two decimals, or `0.00` if it cannot be shown.
pub fn format_token_amount(amount: U256) -> String {
    format_units(amount, "ether")
        .ok()
        .and_then(|ether| ether.parse::<f64>().ok())
        .map_or_else(|| "0.00".to_string(), |value| format!("{value:.2}"))
}
