//! Runs the auction program on a local validator through anchor-client.
//!
//! The validator needs the program and the token metadata program loaded:
//!
//! ```text
//! solana-test-validator --reset \
//!     --bpf-program 3DMhNdR8EXgMdiHN68xUB3Nic1J9H9kFUdMoteouxWXZ target/deploy/dutch_auction.so \
//!     --clone metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s --url mainnet-beta
//! cargo test -p tests -- --ignored --test-threads 1
//! ```

#![cfg(test)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anchor_client::{
    solana_client::nonblocking::rpc_client::RpcClient,
    solana_sdk::{
        commitment_config::CommitmentConfig,
        native_token::LAMPORTS_PER_SOL,
        pubkey::Pubkey,
        signature::{Keypair, Signer},
    },
    Cluster,
};
use dutch_auction_client::config::{DeploySettings, Settings};
use dutch_auction_client::deploy::{deploy, Deployment};
use dutch_auction_client::poller::DEFAULT_POLL_INTERVAL;
use dutch_auction_client::proxy::{AuctionContract, ContractFactory, ItemContract, RpcContracts};
use dutch_auction_client::wallet::WalletSession;
use dutch_auction_client::ClientError;

const INITIAL_PRICE: u64 = 2 * LAMPORTS_PER_SOL;
const DISCOUNT_RATE: u64 = 1_000;
const FLOOR_PRICE: u64 = LAMPORTS_PER_SOL;
const HOUR: i64 = 3600;
/// Lamports per signature on a default test validator
const FEE: u64 = 5_000;
/// Size of an SPL token account
const TOKEN_ACCOUNT_LEN: usize = 165;

fn rpc() -> RpcClient {
    RpcClient::new_with_commitment(Cluster::Localnet.url().to_string(), CommitmentConfig::confirmed())
}

fn contracts() -> RpcContracts {
    RpcContracts::new(Cluster::Localnet, dutch_auction::ID, CommitmentConfig::confirmed())
}

fn revert(message: &str) -> ClientError {
    ClientError::ContractRevert(message.to_string())
}

async fn funded_session(rpc: &RpcClient) -> WalletSession {
    let keypair = Keypair::new();
    let signature = rpc
        .request_airdrop(&keypair.pubkey(), 100 * LAMPORTS_PER_SOL)
        .await
        .unwrap();
    while !rpc.confirm_transaction(&signature).await.unwrap() {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    WalletSession::new(keypair.pubkey(), Arc::new(keypair))
}

/// A fresh seller with one item on auction for `duration` seconds
async fn auction_lasting(rpc: &RpcClient, duration: i64) -> (WalletSession, Deployment) {
    let seller = funded_session(rpc).await;
    let settings = DeploySettings {
        settings: Settings {
            cluster: Cluster::Localnet,
            wallet: PathBuf::new(),
            program_id: dutch_auction::ID,
            auction: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        },
        collection_name: "Validator Items".to_string(),
        collection_symbol: "VAL".to_string(),
        metadata_uri: "https://items.example/0.json".to_string(),
        initial_price: INITIAL_PRICE,
        discount_rate: DISCOUNT_RATE,
        floor_price: FLOOR_PRICE,
        duration,
    };
    let deployment = deploy(&settings, &seller).await.unwrap();
    println!("deployed auction {}", deployment.auction);
    (seller, deployment)
}

async fn balance(rpc: &RpcClient, account: &Pubkey) -> u64 {
    rpc.get_balance(account).await.unwrap()
}

#[tokio::test]
#[ignore = "needs a local validator"]
async fn overpayment_is_refunded_and_the_item_transfers() {
    let rpc = rpc();
    let (_, deployment) = auction_lasting(&rpc, HOUR).await;
    let buyer = funded_session(&rpc).await;
    let auction = contracts().auction(&buyer, deployment.auction).unwrap();
    let items = contracts().item(&buyer, deployment.collection).unwrap();

    let ata_rent = rpc
        .get_minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_LEN)
        .await
        .unwrap();
    let auction_before = balance(&rpc, &deployment.auction).await;
    let buyer_before = balance(&rpc, &buyer.account()).await;

    let signature = auction.buy(INITIAL_PRICE + 5 * LAMPORTS_PER_SOL).await.unwrap();
    println!("buy: {signature}");

    let state = auction.state().await.unwrap();
    assert!(state.sold);
    assert_eq!(state.buyer, buyer.account());
    assert!(state.proceeds <= INITIAL_PRICE);
    assert!(state.proceeds >= FLOOR_PRICE);

    assert_eq!(balance(&rpc, &deployment.auction).await - auction_before, state.proceeds);
    let spent = buyer_before - balance(&rpc, &buyer.account()).await;
    assert_eq!(spent, state.proceeds + ata_rent + FEE);

    assert_eq!(items.owner_of(deployment.token_id).await.unwrap(), buyer.account());
    assert_eq!(items.get_approved(deployment.token_id).await.unwrap(), None);
    assert!(auction.sold().await.unwrap());

    let err = auction.buy(INITIAL_PRICE).await.unwrap_err();
    assert_eq!(err, revert("Auction already sold"));
}

#[tokio::test]
#[ignore = "needs a local validator"]
async fn purchase_after_the_end_is_rejected() {
    let rpc = rpc();
    let (seller, deployment) = auction_lasting(&rpc, 2).await;
    let buyer = funded_session(&rpc).await;
    let auction = contracts().auction(&buyer, deployment.auction).unwrap();
    let items = contracts().item(&buyer, deployment.collection).unwrap();

    tokio::time::sleep(Duration::from_secs(6)).await;
    let auction_before = balance(&rpc, &deployment.auction).await;

    let err = auction.buy(INITIAL_PRICE).await.unwrap_err();
    assert_eq!(err, revert("Auction ended"));

    assert!(!auction.sold().await.unwrap());
    assert_eq!(balance(&rpc, &deployment.auction).await, auction_before);
    assert_eq!(items.owner_of(deployment.token_id).await.unwrap(), seller.account());
}

#[tokio::test]
#[ignore = "needs a local validator"]
async fn underpayment_is_rejected_and_changes_nothing() {
    let rpc = rpc();
    let (seller, deployment) = auction_lasting(&rpc, HOUR).await;
    let buyer = funded_session(&rpc).await;
    let auction = contracts().auction(&buyer, deployment.auction).unwrap();
    let items = contracts().item(&buyer, deployment.collection).unwrap();

    let auction_before = balance(&rpc, &deployment.auction).await;
    let price = auction.get_price().await.unwrap();
    assert!(price <= INITIAL_PRICE);

    let err = auction.buy(1).await.unwrap_err();
    assert_eq!(err, revert("Payment below current price"));

    let state = auction.state().await.unwrap();
    assert!(!state.sold);
    assert_eq!(state.proceeds, 0);
    assert_eq!(balance(&rpc, &deployment.auction).await, auction_before);
    assert_eq!(items.owner_of(deployment.token_id).await.unwrap(), seller.account());
    assert_eq!(
        items.get_approved(deployment.token_id).await.unwrap(),
        Some(deployment.auction)
    );
}

#[tokio::test]
#[ignore = "needs a local validator"]
async fn seller_withdraws_the_proceeds_once() {
    let rpc = rpc();
    let (seller, deployment) = auction_lasting(&rpc, HOUR).await;
    let buyer = funded_session(&rpc).await;
    let seller_side = contracts().auction(&seller, deployment.auction).unwrap();
    let buyer_side = contracts().auction(&buyer, deployment.auction).unwrap();

    let err = seller_side.withdraw_proceeds().await.unwrap_err();
    assert_eq!(err, revert("Auction has not been sold"));

    let auction_before = balance(&rpc, &deployment.auction).await;
    buyer_side.buy(INITIAL_PRICE).await.unwrap();
    let proceeds = seller_side.state().await.unwrap().proceeds;
    assert!(proceeds > 0);

    let err = buyer_side.withdraw_proceeds().await.unwrap_err();
    assert_eq!(err, revert("Only the seller can perform this action"));

    let seller_before = balance(&rpc, &seller.account()).await;
    let signature = seller_side.withdraw_proceeds().await.unwrap();
    println!("withdraw: {signature}");

    assert_eq!(balance(&rpc, &seller.account()).await, seller_before + proceeds - FEE);
    assert_eq!(balance(&rpc, &deployment.auction).await, auction_before);
    assert_eq!(seller_side.state().await.unwrap().proceeds, 0);

    let err = seller_side.withdraw_proceeds().await.unwrap_err();
    assert_eq!(err, revert("No proceeds to withdraw"));
}
