//! Mint pipeline: pin the image, pin the metadata, mint, and optionally
//! approve and list in one sequential run.

use std::fmt;

use alloy_primitives::{Address, B256, U256};

use crate::client::{ImageUpload, TxReceipt};
use crate::contracts::TxRequest;
use crate::error::{MarketError, ValidationError};
use crate::rarity::RarityResult;
use crate::state::NftMetadata;
use crate::units::parse_price;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintStep {
    UploadImage,
    UploadMetadata,
    SubmitMint,
    AwaitMint,
    Approve,
    AwaitApproval,
    List,
    AwaitListing,
}

impl fmt::Display for MintStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MintStep::UploadImage => "uploading the image",
            MintStep::UploadMetadata => "uploading the metadata",
            MintStep::SubmitMint => "submitting the mint transaction",
            MintStep::AwaitMint => "waiting for the mint receipt",
            MintStep::Approve => "approving the marketplace",
            MintStep::AwaitApproval => "waiting for the approval receipt",
            MintStep::List => "listing the token",
            MintStep::AwaitListing => "waiting for the listing receipt",
        };
        f.write_str(text)
    }
}

/// What the user typed into the mint form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintForm {
    pub name: String,
    pub description: String,
    /// List price in display units; empty or absent means mint only.
    pub price: Option<String>,
}

/// A form that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidMint {
    pub name: String,
    pub description: String,
    pub price: Option<U256>,
}

impl MintForm {
    pub fn validate(&self, image: Option<&ImageUpload>) -> Result<ValidMint, ValidationError> {
        match image {
            Some(image) if !image.bytes.is_empty() => {}
            _ => return Err(ValidationError::MissingImage),
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyField("description"));
        }
        let price = match self.price.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(parse_price(p)?),
            _ => None,
        };
        Ok(ValidMint {
            name: name.to_string(),
            description: description.to_string(),
            price,
        })
    }
}

/// Side effects the pipeline needs: pinning plus signing and sending.
#[allow(async_fn_in_trait)]
pub trait MintBackend {
    async fn pin_file(&self, image: &ImageUpload) -> Result<String, MarketError>;
    async fn pin_json(&self, metadata: &NftMetadata) -> Result<String, MarketError>;
    async fn send_transaction(&self, tx: TxRequest) -> Result<B256, MarketError>;
    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, MarketError>;
}

/// Where the pipeline mints and lists, and for whom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintTarget {
    pub nft: Address,
    pub marketplace: Address,
    pub owner: Address,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MintOutcome {
    pub token_id: U256,
    pub token_uri: String,
    pub image_uri: String,
    pub metadata: NftMetadata,
    pub rarity: RarityResult,
    pub listed: bool,
}

pub fn build_metadata(mint: &ValidMint, image_uri: &str, rarity: &RarityResult) -> NftMetadata {
    NftMetadata {
        name: mint.name.clone(),
        description: mint.description.clone(),
        image: image_uri.to_string(),
        attributes: rarity.attributes.clone(),
        ..Default::default()
    }
}

async fn transact<B: MintBackend>(
    backend: &B,
    tx: TxRequest,
    submit: MintStep,
    wait: MintStep,
    progress: &mut impl FnMut(MintStep),
) -> Result<TxReceipt, MarketError> {
    progress(submit);
    let hash = backend
        .send_transaction(tx)
        .await
        .map_err(|e| e.at_step(submit))?;
    tracing::info!("{}: {}", submit, hash);

    progress(wait);
    backend
        .wait_for_receipt(hash)
        .await
        .map_err(|e| e.at_step(wait))
}

/// Runs every step in order. A failing step stops the run; nothing already
/// pinned or mined is undone.
pub async fn run_mint<B: MintBackend>(
    backend: &B,
    target: &MintTarget,
    form: &MintForm,
    image: Option<&ImageUpload>,
    rarity: RarityResult,
    mut progress: impl FnMut(MintStep),
) -> Result<MintOutcome, MarketError> {
    let mint = form.validate(image)?;
    let image = image.ok_or(ValidationError::MissingImage)?;

    progress(MintStep::UploadImage);
    let image_uri = backend
        .pin_file(image)
        .await
        .map_err(|e| e.at_step(MintStep::UploadImage))?;

    progress(MintStep::UploadMetadata);
    let metadata = build_metadata(&mint, &image_uri, &rarity);
    let token_uri = backend
        .pin_json(&metadata)
        .await
        .map_err(|e| e.at_step(MintStep::UploadMetadata))?;

    let receipt = transact(
        backend,
        TxRequest::mint(target.owner, target.nft, target.owner, token_uri.clone()),
        MintStep::SubmitMint,
        MintStep::AwaitMint,
        &mut progress,
    )
    .await?;
    let token_id = receipt
        .minted_token_id(target.nft)
        .ok_or(MarketError::MissingEvent("Transfer"))
        .map_err(|e| e.at_step(MintStep::AwaitMint))?;
    tracing::info!("minted token {} ({})", token_id, rarity.tier);

    let listed = match mint.price {
        Some(price) => {
            transact(
                backend,
                TxRequest::approve(target.owner, target.nft, target.marketplace, token_id),
                MintStep::Approve,
                MintStep::AwaitApproval,
                &mut progress,
            )
            .await?;
            transact(
                backend,
                TxRequest::list(target.owner, target.marketplace, target.nft, token_id, price),
                MintStep::List,
                MintStep::AwaitListing,
                &mut progress,
            )
            .await?;
            true
        }
        None => false,
    };

    Ok(MintOutcome {
        token_id,
        token_uri,
        image_uri,
        metadata,
        rarity,
        listed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LogEntry;
    use crate::contracts::INftCollection;
    use crate::rarity::{RarityGenerator, RARITY_SCORE_TRAIT, RARITY_TRAIT};
    use alloy_sol_types::SolEvent;
    use parking_lot::Mutex;

    const NFT: Address = Address::new([0xcc; 20]);
    const MARKET: Address = Address::new([0xdd; 20]);
    const OWNER: Address = Address::new([0x01; 20]);

    #[derive(Default)]
    struct FakeBackend {
        sent: Mutex<Vec<TxRequest>>,
        pinned: Mutex<Vec<NftMetadata>>,
        fail_listing: bool,
    }

    impl MintBackend for FakeBackend {
        async fn pin_file(&self, _image: &ImageUpload) -> Result<String, MarketError> {
            Ok("ipfs://QmImage".to_string())
        }

        async fn pin_json(&self, metadata: &NftMetadata) -> Result<String, MarketError> {
            self.pinned.lock().push(metadata.clone());
            Ok("ipfs://QmMeta".to_string())
        }

        async fn send_transaction(&self, tx: TxRequest) -> Result<B256, MarketError> {
            let mut sent = self.sent.lock();
            if self.fail_listing && sent.len() == 2 {
                return Err(MarketError::Rpc {
                    code: 4001,
                    message: "user rejected".into(),
                });
            }
            sent.push(tx);
            Ok(B256::repeat_byte(sent.len() as u8))
        }

        async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, MarketError> {
            let logs = if hash == B256::repeat_byte(1) {
                vec![LogEntry {
                    address: NFT,
                    topics: vec![
                        INftCollection::Transfer::SIGNATURE_HASH,
                        B256::ZERO,
                        OWNER.into_word(),
                        B256::left_padding_from(&[7]),
                    ],
                    data: Default::default(),
                }]
            } else {
                Vec::new()
            };
            Ok(TxReceipt {
                transaction_hash: hash,
                status: Some("0x1".into()),
                block_number: Some("0x10".into()),
                logs,
            })
        }
    }

    fn target() -> MintTarget {
        MintTarget {
            nft: NFT,
            marketplace: MARKET,
            owner: OWNER,
        }
    }

    fn image() -> ImageUpload {
        ImageUpload {
            file_name: "cat.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn form(price: Option<&str>) -> MintForm {
        MintForm {
            name: "Test".into(),
            description: "Desc".into(),
            price: price.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_mint_builds_metadata() {
        let backend = FakeBackend::default();
        let rarity = RarityGenerator::standard().roll_seeded(42);
        let mut steps = Vec::new();
        let outcome = run_mint(&backend, &target(), &form(None), Some(&image()), rarity, |s| {
            steps.push(s)
        })
        .await
        .unwrap();

        assert_eq!(outcome.token_id, U256::from(7));
        assert_eq!(outcome.token_uri, "ipfs://QmMeta");
        assert!(!outcome.listed);
        assert_eq!(
            steps,
            vec![
                MintStep::UploadImage,
                MintStep::UploadMetadata,
                MintStep::SubmitMint,
                MintStep::AwaitMint
            ]
        );

        let pinned = backend.pinned.lock()[0].clone();
        assert_eq!(pinned.name, "Test");
        assert_eq!(pinned.description, "Desc");
        assert!(pinned.image.starts_with("ipfs://"));
        assert!(pinned.attribute(RARITY_TRAIT).is_some());
        assert!(pinned.attribute(RARITY_SCORE_TRAIT).is_some());
        assert_eq!(pinned, outcome.metadata);
    }

    #[tokio::test]
    async fn test_mint_and_list() {
        let backend = FakeBackend::default();
        let rarity = RarityGenerator::standard().roll_seeded(1);
        let outcome = run_mint(&backend, &target(), &form(Some("0.05")), Some(&image()), rarity, |_| {})
            .await
            .unwrap();
        assert!(outcome.listed);

        let sent = backend.sent.lock();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].to, NFT);
        assert_eq!(sent[1].to, NFT);
        assert_eq!(sent[2].to, MARKET);
    }

    #[tokio::test]
    async fn test_failing_step_is_named() {
        let backend = FakeBackend {
            fail_listing: true,
            ..Default::default()
        };
        let rarity = RarityGenerator::standard().roll_seeded(1);
        let err = run_mint(&backend, &target(), &form(Some("1")), Some(&image()), rarity, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::MintStep { step: MintStep::List, .. }));
        // mint and approval already went out
        assert_eq!(backend.sent.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        let backend = FakeBackend::default();
        let rarity = RarityGenerator::standard().roll_seeded(1);
        let err = run_mint(&backend, &target(), &form(Some("0")), Some(&image()), rarity, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::InvalidPrice(_))
        ));
        assert!(backend.pinned.lock().is_empty());
    }

    #[test]
    fn test_form_validation() {
        assert_eq!(form(None).validate(None), Err(ValidationError::MissingImage));
        let blank = MintForm {
            name: "  ".into(),
            ..form(None)
        };
        assert_eq!(
            blank.validate(Some(&image())),
            Err(ValidationError::EmptyField("name"))
        );
        let valid = form(Some(" 1.25 ")).validate(Some(&image())).unwrap();
        assert_eq!(valid.price, Some(U256::from(1_250_000_000_000_000_000u64)));
        assert_eq!(form(Some("")).validate(Some(&image())).unwrap().price, None);
        assert!(form(Some("0.0000000000000000001")).validate(Some(&image())).is_err());
    }
}
