// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Typed bindings for the two contracts the studio talks to, and the narrow interfaces the
//! session manager calls through.

use std::sync::Arc;

use alloy::{
    primitives::{Address, Bytes, Log, B256, U256},
    sol,
    sol_types::SolEvent as _,
};
use async_trait::async_trait;

use crate::error::ChainError;

sol! {
    /// The ERC-20 token paid out to creators on every mint.
    #[sol(rpc)]
    interface ICreatorToken {
        function balanceOf(address account) external view returns (uint256);
    }

    /// The NFT collection.
    #[sol(rpc)]
    interface IArtNFT {
        event NFTMinted(uint256 indexed tokenId, address indexed creator, string tokenURI);

        function totalSupply() external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function ownerOf(uint256 tokenId) external view returns (address);
        function getCreator(uint256 tokenId) external view returns (address);
        function creatorRewardAmount() external view returns (uint256);
        function mintNFT(string calldata tokenURI) external returns (uint256);
    }
}

/// The reward token methods used by the session.
#[async_trait]
pub trait RewardToken: Send + Sync {
    fn address(&self) -> Address;

    async fn balance_of(&self, owner: Address) -> Result<U256, ChainError>;
}

/// The NFT collection methods used by the session.
#[async_trait]
pub trait ArtNft: Send + Sync {
    fn address(&self) -> Address;

    async fn total_supply(&self) -> Result<u64, ChainError>;

    async fn token_uri(&self, token_id: u64) -> Result<String, ChainError>;

    async fn owner_of(&self, token_id: u64) -> Result<Address, ChainError>;

    async fn creator_of(&self, token_id: u64) -> Result<Address, ChainError>;

    /// The amount of reward tokens paid to the creator of each new NFT.
    async fn creator_reward_amount(&self) -> Result<U256, ChainError>;

    /// Submits a mint transaction and returns its hash without waiting for inclusion.
    async fn submit_mint(&self, token_uri: &str) -> Result<B256, ChainError>;
}

/// Read and write access to the chain the contracts live on.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// Returns the deployed bytecode at `address`, empty if there is none.
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError>;

    fn reward_token(&self, address: Address) -> Arc<dyn RewardToken>;

    fn art_nft(&self, address: Address) -> Arc<dyn ArtNft>;

    /// Waits until the transaction is included and returns its receipt.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<Receipt, ChainError>;
}

/// The parts of a transaction receipt the session looks at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
    /// Whether the transaction executed without reverting.
    pub success: bool,
    pub logs: Vec<Log>,
}

/// Both contract handles, verified to have code deployed.
#[derive(Clone)]
pub struct ContractHandles {
    pub reward_token: Arc<dyn RewardToken>,
    pub art_nft: Arc<dyn ArtNft>,
}

impl std::fmt::Debug for ContractHandles {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter
            .debug_struct("ContractHandles")
            .field("reward_token", &self.reward_token.address())
            .field("art_nft", &self.art_nft.address())
            .finish()
    }
}

/// Returns the token ID from the first `NFTMinted` event among `logs`.
pub fn find_minted_token(logs: &[Log]) -> Option<U256> {
    logs.iter()
        .filter(|log| log.topics().first() == Some(&IArtNFT::NFTMinted::SIGNATURE_HASH))
        .find_map(|log| IArtNFT::NFTMinted::decode_log(log).ok())
        .map(|event| event.data.tokenId)
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Address, Log, LogData, B256, U256},
        sol_types::SolEvent as _,
    };

    use super::{find_minted_token, IArtNFT};

    fn minted_log(token_id: u64) -> Log {
        let event = IArtNFT::NFTMinted {
            tokenId: U256::from(token_id),
            creator: Address::repeat_byte(0xaa),
            tokenURI: "ipfs://QmToken".to_string(),
        };
        Log {
            address: Address::repeat_byte(0x01),
            data: event.encode_log_data(),
        }
    }

    #[test]
    fn finds_token_id_among_other_logs() {
        let unrelated = Log {
            address: Address::repeat_byte(0x02),
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x55)], vec![1, 2, 3].into()),
        };

        let logs = vec![unrelated, minted_log(7)];

        assert_eq!(find_minted_token(&logs), Some(U256::from(7)));
    }

    #[test]
    fn no_event_yields_none() {
        assert_eq!(find_minted_token(&[]), None);
    }
}
