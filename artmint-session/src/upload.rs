// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Client-side checks and the publishing flow for new artwork.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    error::{SessionError, ValidationError},
    metadata::{NftAttribute, NftMetadata},
};

/// The largest file accepted for upload, in bytes.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// The MIME types accepted for upload.
pub const SUPPORTED_FILE_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "audio/mp3",
    "audio/wav",
];

/// A file picked by the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Checks the size and type of `file` before anything is sent to the pinning service.
pub fn validate_upload(file: &FileUpload) -> Result<(), ValidationError> {
    let size = file.size();
    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size });
    }
    if !SUPPORTED_FILE_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationError::UnsupportedType {
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}

/// A content-pinning service returning content identifiers.
#[async_trait]
pub trait PinningService: Send + Sync {
    async fn pin_file(&self, file: &FileUpload) -> Result<String, SessionError>;

    async fn pin_json(
        &self,
        name: &str,
        document: &serde_json::Value,
    ) -> Result<String, SessionError>;
}

/// What the user filled in for a new piece.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArtworkDraft {
    pub name: String,
    pub description: String,
    pub attributes: Vec<NftAttribute>,
}

/// The result of publishing a piece, ready to be minted.
#[derive(Clone, Debug, PartialEq)]
pub struct PublishedArtwork {
    pub image_uri: String,
    pub token_uri: String,
    pub metadata: NftMetadata,
}

fn ipfs_uri(cid: &str) -> String {
    format!("ipfs://{cid}")
}

/// Builds the metadata document for a draft whose media lives at `image_uri`.
pub fn create_metadata(draft: &ArtworkDraft, image_uri: impl Into<String>) -> NftMetadata {
    NftMetadata {
        name: draft.name.clone(),
        description: draft.description.clone(),
        image: image_uri.into(),
        attributes: draft.attributes.clone(),
    }
}

/// Validates and pins the media, then pins the metadata document pointing at it.
#[instrument(skip_all, fields(file = %file.name))]
pub async fn publish_artwork(
    pinning: &dyn PinningService,
    file: &FileUpload,
    draft: &ArtworkDraft,
) -> Result<PublishedArtwork, SessionError> {
    validate_upload(file)?;

    let image_cid = pinning.pin_file(file).await?;
    let image_uri = ipfs_uri(&image_cid);
    debug!(%image_uri, "Pinned media");

    let metadata = create_metadata(draft, image_uri.clone());
    let document = serde_json::to_value(&metadata)
        .map_err(|error| SessionError::Pinning(Box::new(error)))?;
    let metadata_cid = pinning
        .pin_json(&format!("{}-metadata", draft.name), &document)
        .await?;
    let token_uri = ipfs_uri(&metadata_cid);
    debug!(%token_uri, "Pinned metadata");

    Ok(PublishedArtwork {
        image_uri,
        token_uri,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::{create_metadata, validate_upload, ArtworkDraft, FileUpload, MAX_FILE_SIZE};
    use crate::{
        error::ValidationError,
        metadata::{AttributeValue, NftAttribute},
    };

    fn upload(content_type: &str, size: u64) -> FileUpload {
        FileUpload {
            name: "piece".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0; size as usize],
        }
    }

    #[test]
    fn accepts_file_at_size_limit() {
        assert_eq!(validate_upload(&upload("image/png", MAX_FILE_SIZE)), Ok(()));
    }

    #[test]
    fn rejects_oversized_file() {
        let error = validate_upload(&upload("image/png", MAX_FILE_SIZE + 1)).unwrap_err();

        assert_matches!(error, ValidationError::TooLarge { size } if size == MAX_FILE_SIZE + 1);
        assert_eq!(error.to_string(), "File is too large. Maximum size is 10MB.");
    }

    #[test]
    fn rejects_unsupported_type() {
        assert_matches!(
            validate_upload(&upload("application/pdf", 10)),
            Err(ValidationError::UnsupportedType { content_type }) if content_type == "application/pdf"
        );
    }

    #[test]
    fn metadata_carries_the_draft() {
        let draft = ArtworkDraft {
            name: "Dusk".to_string(),
            description: "Last light".to_string(),
            attributes: vec![NftAttribute {
                trait_type: "Edition".to_string(),
                value: AttributeValue::Number(3.into()),
            }],
        };

        let metadata = create_metadata(&draft, "ipfs://QmDusk");

        assert_eq!(metadata.image, "ipfs://QmDusk");
        assert_eq!(metadata.name, draft.name);
        assert_eq!(metadata.attributes, draft.attributes);
        assert_eq!(draft.clone(), draft);
    }
}
