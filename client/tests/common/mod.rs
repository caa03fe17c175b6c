//! In-memory wallet, chain and metadata source for driving `AuctionClient`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anchor_client::solana_sdk::{
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::TransactionError,
};
use dutch_auction::error::DutchAuctionError;
use dutch_auction::state::PriceSchedule;
use dutch_auction_client::metadata::{ItemMetadata, MetadataSource};
use dutch_auction_client::proxy::{AuctionContract, ContractFactory, ItemContract, ItemRef};
use dutch_auction_client::wallet::{WalletProvider, WalletSession};
use dutch_auction_client::{AuctionClient, ClientError, ClientOptions};

pub const START: i64 = 1_700_000_000;
pub const HOUR: i64 = 3600;
pub const DAY: i64 = 24 * HOUR;
pub const P0: u64 = 10_000_000_000;
pub const RATE: u64 = 1_000_000;
pub const TOKEN_ID: u64 = 0;
pub const URI: &str = "https://items.example/0.json";

pub type TestClient = AuctionClient<MockWallet, MockFactory, MockMetadata>;

pub enum MockWallet {
    Missing,
    Rejecting,
    Authorized(Arc<Keypair>),
}

impl MockWallet {
    pub fn authorized() -> Self {
        MockWallet::Authorized(Arc::new(Keypair::new()))
    }
}

impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Pubkey>, ClientError> {
        match self {
            MockWallet::Missing => Err(ClientError::NoWallet),
            MockWallet::Rejecting => Ok(vec![]),
            MockWallet::Authorized(keypair) => Ok(vec![keypair.pubkey()]),
        }
    }

    fn signer(&self, account: &Pubkey) -> Result<Arc<Keypair>, ClientError> {
        match self {
            MockWallet::Missing => Err(ClientError::NoWallet),
            MockWallet::Authorized(keypair) if keypair.pubkey() == *account => Ok(keypair.clone()),
            _ => Err(ClientError::UserRejected),
        }
    }
}

/// One auction and its item, settled by the program's own pricing rules
pub struct ChainState {
    pub now: i64,
    pub schedule: PriceSchedule,
    pub sold: bool,
    pub seller: Pubkey,
    pub owner: Pubkey,
    pub approved: Option<Pubkey>,
    /// Lamports held by the auction account
    pub retained: u64,
    /// Lamports per buyer
    pub balances: Vec<(Pubkey, u64)>,
    pub collection: Pubkey,
    pub uri: Option<String>,
    /// Zero-based `get_price` calls that fail
    pub failing_polls: Vec<usize>,
    /// Every `sold` read fails while set
    pub sold_unreadable: bool,
}

#[derive(Clone)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
    auction: Pubkey,
    price_calls: Arc<AtomicUsize>,
}

impl MockChain {
    pub fn new(duration: i64, floor: u64) -> Self {
        let seller = Pubkey::new_unique();
        let auction = Pubkey::new_unique();
        let state = ChainState {
            now: START,
            schedule: PriceSchedule::new(START, P0, RATE, floor, duration).unwrap(),
            sold: false,
            seller,
            owner: seller,
            approved: Some(auction),
            retained: 0,
            balances: vec![],
            collection: Pubkey::new_unique(),
            uri: Some(URI.to_string()),
            failing_polls: vec![],
            sold_unreadable: false,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            auction,
            price_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.auction
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut ChainState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    /// Move the cluster clock to `start + elapsed`
    pub fn set_elapsed(&self, elapsed: i64) {
        self.with_state(|state| state.now = START + elapsed);
    }

    pub fn fund(&self, account: Pubkey, lamports: u64) {
        self.with_state(|state| state.balances.push((account, lamports)));
    }

    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.with_state(|state| {
            state
                .balances
                .iter()
                .find(|(key, _)| key == account)
                .map_or(0, |(_, lamports)| *lamports)
        })
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

fn revert(err: DutchAuctionError) -> ClientError {
    ClientError::from_transaction_error(TransactionError::InstructionError(
        0,
        InstructionError::Custom(u32::from(err)),
    ))
}

pub struct MockAuction {
    chain: MockChain,
    buyer: Pubkey,
}

impl AuctionContract for MockAuction {
    async fn get_price(&self) -> Result<u64, ClientError> {
        let call = self.chain.price_calls.fetch_add(1, Ordering::SeqCst);
        self.chain.with_state(|state| {
            if state.failing_polls.contains(&call) {
                return Err(ClientError::Network("rpc timed out".to_string()));
            }
            Ok(state.schedule.price_at(state.now))
        })
    }

    async fn sold(&self) -> Result<bool, ClientError> {
        self.chain.with_state(|state| {
            if state.sold_unreadable {
                return Err(ClientError::Network("rpc timed out".to_string()));
            }
            Ok(state.sold)
        })
    }

    async fn nft(&self) -> Result<ItemRef, ClientError> {
        Ok(ItemRef {
            collection: self.chain.with_state(|state| state.collection),
            token_id: TOKEN_ID,
        })
    }

    async fn buy(&self, payment: u64) -> Result<Signature, ClientError> {
        let buyer = self.buyer;
        self.chain.with_state(|state| {
            let settlement = state
                .schedule
                .settle(state.sold, state.now, payment)
                .map_err(revert)?;
            if state.approved != Some(self.chain.auction) {
                return Err(revert(DutchAuctionError::NotApproved));
            }

            let balance = state
                .balances
                .iter_mut()
                .find(|(key, _)| *key == buyer)
                .map(|(_, lamports)| lamports)
                .ok_or(ClientError::InsufficientFunds)?;
            if *balance < payment {
                return Err(ClientError::InsufficientFunds);
            }

            *balance -= settlement.price;
            state.retained += settlement.price;
            state.owner = buyer;
            state.approved = None;
            state.sold = true;
            Ok(Signature::new_unique())
        })
    }
}

pub struct MockItem {
    chain: MockChain,
}

impl ItemContract for MockItem {
    async fn token_uri(&self, token_id: u64) -> Result<String, ClientError> {
        assert_eq!(token_id, TOKEN_ID);
        self.chain
            .with_state(|state| state.uri.clone())
            .ok_or_else(|| ClientError::Network("metadata account not found".to_string()))
    }

    async fn owner_of(&self, _token_id: u64) -> Result<Pubkey, ClientError> {
        Ok(self.chain.with_state(|state| state.owner))
    }

    async fn get_approved(&self, _token_id: u64) -> Result<Option<Pubkey>, ClientError> {
        Ok(self.chain.with_state(|state| state.approved))
    }
}

pub struct MockFactory {
    pub chain: MockChain,
}

impl ContractFactory for MockFactory {
    type Auction = MockAuction;
    type Item = MockItem;

    fn auction(&self, session: &WalletSession, address: Pubkey) -> Result<MockAuction, ClientError> {
        if address != self.chain.auction {
            return Err(ClientError::Network(format!("no auction at {address}")));
        }
        Ok(MockAuction {
            chain: self.chain.clone(),
            buyer: session.account(),
        })
    }

    fn item(&self, _session: &WalletSession, _collection: Pubkey) -> Result<MockItem, ClientError> {
        Ok(MockItem {
            chain: self.chain.clone(),
        })
    }
}

/// Serves one fixed document, or fails every fetch
pub struct MockMetadata {
    pub document: Option<ItemMetadata>,
    pub fetches: AtomicUsize,
}

impl MockMetadata {
    pub fn serving(document: ItemMetadata) -> Self {
        Self {
            document: Some(document),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            document: None,
            fetches: AtomicUsize::new(0),
        }
    }
}

impl MetadataSource for MockMetadata {
    async fn fetch(&self, uri: &str) -> Result<ItemMetadata, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        assert_eq!(uri, URI);
        self.document
            .clone()
            .ok_or_else(|| ClientError::MetadataFetch(format!("{uri} returned 404 Not Found")))
    }
}

pub fn sunset() -> ItemMetadata {
    ItemMetadata {
        name: "Sunset #0".to_string(),
        image: "https://items.example/0.png".to_string(),
        description: "An orange sky over the bay".to_string(),
    }
}

pub fn client(wallet: MockWallet, chain: &MockChain, metadata: MockMetadata) -> TestClient {
    let options = ClientOptions::new(chain.address());
    AuctionClient::new(
        wallet,
        MockFactory {
            chain: chain.clone(),
        },
        metadata,
        options,
    )
}

pub fn funded_client(chain: &MockChain, lamports: u64) -> (TestClient, Pubkey) {
    let wallet = MockWallet::authorized();
    let account = match &wallet {
        MockWallet::Authorized(keypair) => keypair.pubkey(),
        _ => unreachable!(),
    };
    chain.fund(account, lamports);
    (client(wallet, chain, MockMetadata::serving(sunset())), account)
}
