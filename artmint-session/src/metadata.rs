// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SessionError;

const IPFS_SCHEME: &str = "ipfs://";

/// The JSON document a token URI points to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<NftAttribute>,
}

impl NftMetadata {
    /// The record shown for a token whose metadata could not be loaded.
    pub fn placeholder(token_id: u64) -> Self {
        Self {
            name: format!("NFT #{token_id}"),
            description: "Metadata unavailable".to_string(),
            image: String::new(),
            attributes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

/// Attribute values are free-form strings or numbers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(serde_json::Number),
    Text(String),
}

/// Turns a token or image URI into a URL that can be fetched over HTTP.
pub fn resolve_content_uri(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix(IPFS_SCHEME) {
        Some(cid) if gateway.ends_with('/') => format!("{gateway}{cid}"),
        Some(cid) => format!("{gateway}/{cid}"),
        None => uri.to_string(),
    }
}

/// Loads metadata documents.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<NftMetadata, SessionError>;
}

/// Fetches metadata documents over HTTP.
#[derive(Clone, Debug)]
pub struct HttpMetadataFetcher {
    client: reqwest::Client,
}

impl HttpMetadataFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch(&self, url: &str) -> Result<NftMetadata, SessionError> {
        trace!(%url, "Fetching metadata");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| SessionError::metadata_unavailable(url, error))?;
        response
            .json()
            .await
            .map_err(|error| SessionError::metadata_unavailable(url, error))
    }
}
