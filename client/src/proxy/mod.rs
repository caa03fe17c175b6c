//! Typed handles over the deployed auction and its item collection.

use std::future::Future;

use anchor_client::solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::error::ClientError;
use crate::wallet::WalletSession;

mod rpc;

pub use rpc::{RpcAuction, RpcContracts, RpcItem};

/// Item an auction sells: its collection and token id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub collection: Pubkey,
    pub token_id: u64,
}

pub trait AuctionContract: Send + Sync + 'static {
    /// Advisory price; the purchase is priced when it executes.
    fn get_price(&self) -> impl Future<Output = Result<u64, ClientError>> + Send;

    fn sold(&self) -> impl Future<Output = Result<bool, ClientError>> + Send;

    fn nft(&self) -> impl Future<Output = Result<ItemRef, ClientError>> + Send;

    /// Submit a purchase paying at most `payment` lamports and wait for it to land.
    ///
    /// Not `Send`: anchor-client's request future borrows its signers as `&dyn Signer`.
    /// Purchases run on the caller's task, never inside the poller.
    fn buy(&self, payment: u64) -> impl Future<Output = Result<Signature, ClientError>>;
}

pub trait ItemContract: Send + Sync + 'static {
    fn token_uri(&self, token_id: u64) -> impl Future<Output = Result<String, ClientError>> + Send;

    fn owner_of(&self, token_id: u64) -> impl Future<Output = Result<Pubkey, ClientError>> + Send;

    fn get_approved(
        &self,
        token_id: u64,
    ) -> impl Future<Output = Result<Option<Pubkey>, ClientError>> + Send;
}

/// Builds contract handles that sign with a wallet session
pub trait ContractFactory: Send + Sync {
    type Auction: AuctionContract;
    type Item: ItemContract;

    fn auction(&self, session: &WalletSession, address: Pubkey) -> Result<Self::Auction, ClientError>;

    fn item(&self, session: &WalletSession, collection: Pubkey) -> Result<Self::Item, ClientError>;
}
