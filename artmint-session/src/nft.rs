// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! The NFT read model, rebuilt from the chain on every refresh.

use alloy::primitives::Address;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    contracts::ArtNft,
    error::ChainError,
    metadata::{resolve_content_uri, MetadataFetcher, NftMetadata},
};

/// One token as read from the chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftRecord {
    pub id: u64,
    pub token_uri: String,
    pub metadata: NftMetadata,
    pub owner: Address,
    pub creator: Address,
}

/// The result of one refresh, with the account's views derived from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftCatalog {
    all: Vec<NftRecord>,
    owned: Vec<NftRecord>,
    created: Vec<NftRecord>,
}

impl NftCatalog {
    /// Builds the catalog, selecting what `account` owns and created.
    pub fn new(records: Vec<NftRecord>, account: Option<Address>) -> Self {
        let (owned, created) = match account {
            Some(account) => (
                records
                    .iter()
                    .filter(|record| record.owner == account)
                    .cloned()
                    .collect(),
                records
                    .iter()
                    .filter(|record| record.creator == account)
                    .cloned()
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            all: records,
            owned,
            created,
        }
    }

    /// Gives back every record, dropping the account's views.
    pub fn into_records(self) -> Vec<NftRecord> {
        self.all
    }

    pub fn all(&self) -> &[NftRecord] {
        &self.all
    }

    /// The records owned by the account.
    pub fn owned(&self) -> &[NftRecord] {
        &self.owned
    }

    /// The records created by the account.
    pub fn created(&self) -> &[NftRecord] {
        &self.created
    }
}

/// Reads every token of `nft` and its metadata.
///
/// Tokens whose chain reads fail are left out. Tokens whose metadata cannot be loaded get
/// a placeholder. Only a failure to read the total supply fails the whole refresh.
#[instrument(skip_all, fields(nft = %nft.address()))]
pub async fn load_catalog(
    nft: &dyn ArtNft,
    fetcher: &dyn MetadataFetcher,
    gateway: &str,
    account: Option<Address>,
) -> Result<NftCatalog, ChainError> {
    let total_supply = nft.total_supply().await?;
    debug!(total_supply, "Loading NFTs");

    let mut records = Vec::new();
    for id in 0..total_supply {
        match load_record(nft, fetcher, gateway, id).await {
            Ok(record) => records.push(record),
            Err(error) => warn!(%error, token_id = id, "Skipping NFT"),
        }
    }
    Ok(NftCatalog::new(records, account))
}

async fn load_record(
    nft: &dyn ArtNft,
    fetcher: &dyn MetadataFetcher,
    gateway: &str,
    id: u64,
) -> Result<NftRecord, ChainError> {
    let token_uri = nft.token_uri(id).await?;
    let owner = nft.owner_of(id).await?;
    let creator = nft.creator_of(id).await?;

    let url = resolve_content_uri(&token_uri, gateway);
    let metadata = match fetcher.fetch(&url).await {
        Ok(metadata) => metadata,
        Err(error) => {
            warn!(%error, token_id = id, "Using placeholder metadata");
            NftMetadata::placeholder(id)
        }
    };

    Ok(NftRecord {
        id,
        token_uri,
        metadata,
        owner,
        creator,
    })
}
