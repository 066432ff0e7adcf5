// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// An external wallet granting access to accounts and networks.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the user for account access. The first account is the active one.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Asks the wallet to switch to `chain_id`. Fails with code 4902 if the wallet does
    /// not know the chain.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    async fn add_chain(&self, parameters: &ChainParameters) -> Result<(), ProviderError>;
}

/// An out-of-band notification from the wallet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
    Disconnected,
}

/// The description of a network handed to the wallet when adding it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParameters {
    /// The chain ID as a `0x`-prefixed hexadecimal string.
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl ChainParameters {
    /// Parses the hexadecimal chain ID back into a number.
    pub fn numeric_chain_id(&self) -> Option<u64> {
        let digits = self.chain_id.strip_prefix("0x")?;
        u64::from_str_radix(digits, 16).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainParameters, NativeCurrency};

    #[test]
    fn serializes_in_wallet_shape() {
        let parameters = ChainParameters {
            chain_id: "0x242".to_string(),
            chain_name: "Lisk Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Lisk".to_string(),
                symbol: "LSK".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://testnet-rpc.lisk.com".to_string()],
            block_explorer_urls: vec!["https://testnet-explorer.lisk.com".to_string()],
        };

        let json = serde_json::to_value(&parameters).unwrap();

        assert_eq!(json["chainId"], "0x242");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["blockExplorerUrls"][0], "https://testnet-explorer.lisk.com");
        assert_eq!(parameters.numeric_chain_id(), Some(578));
    }
}
