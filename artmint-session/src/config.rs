// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use alloy::primitives::Address;

use crate::wallet::{ChainParameters, NativeCurrency};

pub const DEFAULT_CHAIN_ID: u64 = 578;
pub const DEFAULT_NETWORK_NAME: &str = "Lisk Testnet";
pub const DEFAULT_RPC_URL: &str = "https://testnet-rpc.lisk.com";
pub const DEFAULT_EXPLORER_URL: &str = "https://testnet-explorer.lisk.com";
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.pinata.cloud/ipfs/";
pub const DEFAULT_METADATA_TIMEOUT_MS: u64 = 30_000;

/// Where the session finds the network and its contracts.
#[derive(Debug, Clone, clap::Args, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// The address of the creator reward token contract.
    #[arg(long, env = "ARTMINT_CREATOR_TOKEN_ADDRESS")]
    pub creator_token_address: Option<Address>,

    /// The address of the NFT contract.
    #[arg(long, env = "ARTMINT_ART_NFT_ADDRESS")]
    pub art_nft_address: Option<Address>,

    /// The chain the contracts are deployed on.
    #[arg(long, default_value_t = DEFAULT_CHAIN_ID, env = "ARTMINT_CHAIN_ID")]
    pub chain_id: u64,

    /// The name shown by the wallet when the network is added.
    #[arg(long, default_value = DEFAULT_NETWORK_NAME, env = "ARTMINT_NETWORK_NAME")]
    pub network_name: String,

    #[arg(long, default_value = DEFAULT_RPC_URL, env = "ARTMINT_RPC_URL")]
    pub rpc_url: String,

    #[arg(long, default_value = DEFAULT_EXPLORER_URL, env = "ARTMINT_EXPLORER_URL")]
    pub explorer_url: String,

    /// The HTTP gateway used to resolve `ipfs://` URIs.
    #[arg(long, default_value = DEFAULT_GATEWAY_URL, env = "ARTMINT_GATEWAY_URL")]
    pub gateway_url: String,

    /// How long to wait for a metadata document before using a placeholder.
    #[arg(
        long = "metadata-timeout-ms",
        default_value_t = DEFAULT_METADATA_TIMEOUT_MS,
        env = "ARTMINT_METADATA_TIMEOUT_MS"
    )]
    pub metadata_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            creator_token_address: None,
            art_nft_address: None,
            chain_id: DEFAULT_CHAIN_ID,
            network_name: DEFAULT_NETWORK_NAME.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            metadata_timeout_ms: DEFAULT_METADATA_TIMEOUT_MS,
        }
    }
}

impl SessionConfig {
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }

    /// The contract addresses, if both are configured.
    pub fn contract_addresses(&self) -> Option<(Address, Address)> {
        Some((self.creator_token_address?, self.art_nft_address?))
    }

    /// The network description handed to the wallet when it does not know the chain.
    pub fn chain_parameters(&self) -> ChainParameters {
        ChainParameters {
            chain_id: format!("{:#x}", self.chain_id),
            chain_name: self.network_name.clone(),
            native_currency: NativeCurrency {
                name: "Lisk".to_string(),
                symbol: "LSK".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }
}
