// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! The collaborators backed by an Ethereum JSON-RPC node.

use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, B256, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::{
    contracts::{
        ArtNft, ChainBackend, IArtNFT::IArtNFTInstance, ICreatorToken::ICreatorTokenInstance,
        Receipt, RewardToken,
    },
    error::{ChainError, ProviderError},
    wallet::{ChainParameters, WalletProvider},
};

/// Talks to the contracts through a JSON-RPC node, signing with a local key if one is given.
#[derive(Clone)]
pub struct EthereumBackend {
    provider: DynProvider,
}

impl EthereumBackend {
    /// Connects to the node at `rpc_url`.
    pub fn new(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<Self, ChainError> {
        let rpc_url = rpc_url.parse::<Url>()?;
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(rpc_url)
                .erased(),
            None => ProviderBuilder::new().connect_http(rpc_url).erased(),
        };
        Ok(Self { provider })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

#[async_trait]
impl ChainBackend for EthereumBackend {
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self.provider.get_code_at(address).await?)
    }

    fn reward_token(&self, address: Address) -> Arc<dyn RewardToken> {
        Arc::new(AlloyRewardToken {
            contract: ICreatorTokenInstance::new(address, self.provider.clone()),
        })
    }

    fn art_nft(&self, address: Address) -> Arc<dyn ArtNft> {
        Arc::new(AlloyArtNft {
            contract: IArtNFTInstance::new(address, self.provider.clone()),
        })
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<Receipt, ChainError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;
        debug!(%tx_hash, status = receipt.status(), "Received receipt");
        Ok(Receipt {
            tx_hash,
            success: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        })
    }
}

struct AlloyRewardToken {
    contract: ICreatorTokenInstance<DynProvider>,
}

#[async_trait]
impl RewardToken for AlloyRewardToken {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        Ok(self.contract.balanceOf(owner).call().await?)
    }
}

struct AlloyArtNft {
    contract: IArtNFTInstance<DynProvider>,
}

#[async_trait]
impl ArtNft for AlloyArtNft {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn total_supply(&self) -> Result<u64, ChainError> {
        let supply = self.contract.totalSupply().call().await?;
        u64::try_from(supply).map_err(|_| ChainError::SupplyOutOfRange(supply))
    }

    async fn token_uri(&self, token_id: u64) -> Result<String, ChainError> {
        Ok(self.contract.tokenURI(U256::from(token_id)).call().await?)
    }

    async fn owner_of(&self, token_id: u64) -> Result<Address, ChainError> {
        Ok(self.contract.ownerOf(U256::from(token_id)).call().await?)
    }

    async fn creator_of(&self, token_id: u64) -> Result<Address, ChainError> {
        Ok(self.contract.getCreator(U256::from(token_id)).call().await?)
    }

    async fn creator_reward_amount(&self) -> Result<U256, ChainError> {
        Ok(self.contract.creatorRewardAmount().call().await?)
    }

    async fn submit_mint(&self, token_uri: &str) -> Result<B256, ChainError> {
        let pending = self.contract.mintNFT(token_uri.to_string()).send().await?;
        Ok(*pending.tx_hash())
    }
}

/// A wallet made of a local key and the node it is connected to.
///
/// The node decides the network, so the wallet can neither switch nor add chains.
pub struct LocalWallet {
    provider: DynProvider,
    account: Option<Address>,
}

impl LocalWallet {
    /// Uses `account` if given, otherwise the accounts managed by the node.
    pub fn new(provider: DynProvider, account: Option<Address>) -> Self {
        Self { provider, account }
    }
}

fn internal_error(error: impl std::fmt::Display) -> ProviderError {
    ProviderError::new(ProviderError::INTERNAL, error.to_string())
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        match self.account {
            Some(account) => Ok(vec![account]),
            None => self.provider.get_accounts().await.map_err(internal_error),
        }
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.provider.get_chain_id().await.map_err(internal_error)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        if self.chain_id().await? == chain_id {
            Ok(())
        } else {
            Err(ProviderError::unrecognized_chain(chain_id))
        }
    }

    async fn add_chain(&self, parameters: &ChainParameters) -> Result<(), ProviderError> {
        Err(ProviderError::new(
            ProviderError::UNSUPPORTED_METHOD,
            format!(
                "cannot add {} to a wallet bound to a single node",
                parameters.chain_name
            ),
        ))
    }
}
