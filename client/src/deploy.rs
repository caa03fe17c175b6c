use std::sync::Arc;

use anchor_client::solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Keypair, system_program,
};
use anchor_client::{ClientError as AnchorClientError, Program};
use anchor_spl::associated_token::get_associated_token_address;
use dutch_auction::{
    accounts, instruction,
    state::{Auction, Collection, Item},
};

use crate::config::DeploySettings;
use crate::error::ClientError;
use crate::proxy::{ContractFactory, ItemContract, RpcContracts};
use crate::wallet::WalletSession;

/// Addresses produced by a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub collection: Pubkey,
    pub token_id: u64,
    pub mint: Pubkey,
    pub auction: Pubkey,
}

/// Mint one item to the deployer, auction it and approve the auction to transfer it.
///
/// The deployer's collection is reused when it already exists.
pub async fn deploy(settings: &DeploySettings, session: &WalletSession) -> Result<Deployment, ClientError> {
    let contracts = RpcContracts::new(
        settings.settings.cluster.clone(),
        settings.settings.program_id,
        CommitmentConfig::confirmed(),
    );
    let program = contracts.program(session)?;
    let seller = session.account();

    let collection = ensure_collection(&program, settings).await?;
    let items = contracts.item(session, collection)?;

    let token_id = items.award_item(seller, &settings.metadata_uri).await?;
    let (mint, _) = Item::mint_address(&collection, token_id);
    log::info!("item {token_id} minted to {seller}: mint={mint}");

    let auction = create_auction(&program, settings, collection, token_id, mint).await?;

    items.approve(auction, token_id).await?;
    match items.get_approved(token_id).await? {
        Some(approved) if approved == auction => {
            log::info!("auction {auction} approved for item {token_id}");
        }
        other => {
            return Err(ClientError::ContractRevert(format!(
                "item {token_id} approval is {other:?}, expected {auction}"
            )));
        }
    }

    let deployment = Deployment {
        collection,
        token_id,
        mint,
        auction,
    };
    log::info!("deployment complete: {deployment:?}");
    Ok(deployment)
}

async fn ensure_collection(
    program: &Program<Arc<Keypair>>,
    settings: &DeploySettings,
) -> Result<Pubkey, ClientError> {
    let authority = program.payer();
    let (collection, _) = Collection::address(&authority);

    match program.account::<Collection>(collection).await {
        Ok(existing) => {
            log::info!(
                "reusing collection {collection} ({}), next token id {}",
                existing.name,
                existing.next_token_id
            );
            return Ok(collection);
        }
        Err(AnchorClientError::AccountNotFound) => {}
        Err(err) => return Err(err.into()),
    }

    let signature = program
        .request()
        .accounts(accounts::InitializeCollection {
            collection,
            authority,
            system_program: system_program::ID,
        })
        .args(instruction::InitializeCollection {
            name: settings.collection_name.clone(),
            symbol: settings.collection_symbol.clone(),
        })
        .send()
        .await?;

    log::info!("collection {collection} initialized: tx={signature}");
    Ok(collection)
}

async fn create_auction(
    program: &Program<Arc<Keypair>>,
    settings: &DeploySettings,
    collection: Pubkey,
    token_id: u64,
    mint: Pubkey,
) -> Result<Pubkey, ClientError> {
    let seller = program.payer();
    let (auction, _) = Auction::address(&collection, token_id);

    let signature = program
        .request()
        .accounts(accounts::CreateAuction {
            auction,
            collection,
            item: Item::address(&collection, token_id).0,
            seller_token_account: get_associated_token_address(&seller, &mint),
            seller,
            system_program: system_program::ID,
        })
        .args(instruction::CreateAuction {
            token_id,
            initial_price: settings.initial_price,
            discount_rate: settings.discount_rate,
            floor_price: settings.floor_price,
            duration: settings.duration,
        })
        .send()
        .await?;

    log::info!(
        "auction {auction} created: start {} lamports, -{}/s, floor {}, {}s, tx={signature}",
        settings.initial_price,
        settings.discount_rate,
        settings.floor_price,
        settings.duration
    );
    Ok(auction)
}
