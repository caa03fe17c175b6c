use std::sync::Arc;
use std::time::Duration;

use anchor_client::solana_sdk::{pubkey::Pubkey, signature::Signature};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::metadata::{ItemMetadata, MetadataSource};
use crate::poller::{PricePoller, DEFAULT_POLL_INTERVAL};
use crate::proxy::{AuctionContract, ContractFactory, ItemContract, ItemRef};
use crate::view::AuctionView;
use crate::wallet::{WalletProvider, WalletSession};

#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Address of the deployed auction account
    pub auction: Pubkey,
    pub poll_interval: Duration,
}

impl ClientOptions {
    pub fn new(auction: Pubkey) -> Self {
        Self {
            auction,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Auction and item state as read from chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionSnapshot {
    pub item: ItemRef,
    pub sold: bool,
    pub metadata: Option<ItemMetadata>,
}

struct Connection<A> {
    session: WalletSession,
    auction: Arc<A>,
    poller: Option<PricePoller>,
}

/// Drives connect, state loading, price polling and purchases, and owns the view model.
pub struct AuctionClient<W, F, M>
where
    F: ContractFactory,
{
    wallet: W,
    contracts: F,
    metadata: M,
    options: ClientOptions,
    view: Arc<watch::Sender<AuctionView>>,
    connection: Option<Connection<F::Auction>>,
}

impl<W, F, M> AuctionClient<W, F, M>
where
    W: WalletProvider,
    F: ContractFactory,
    M: MetadataSource,
{
    pub fn new(wallet: W, contracts: F, metadata: M, options: ClientOptions) -> Self {
        let (view, _) = watch::channel(AuctionView::Disconnected);
        Self {
            wallet,
            contracts,
            metadata,
            options,
            view: Arc::new(view),
            connection: None,
        }
    }

    /// Receiver notified on every view replacement
    pub fn subscribe(&self) -> watch::Receiver<AuctionView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> AuctionView {
        self.view.borrow().clone()
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.connection.as_ref().map(|connection| &connection.session)
    }

    pub fn is_polling(&self) -> bool {
        self.connection
            .as_ref()
            .and_then(|connection| connection.poller.as_ref())
            .is_some_and(PricePoller::is_running)
    }

    /// Authorize with the wallet, load the auction and start polling its price.
    ///
    /// Any previous connection is torn down first. On failure the view stays
    /// disconnected.
    pub async fn connect(&mut self) -> Result<WalletSession, ClientError> {
        self.disconnect().await;

        let accounts = self.wallet.request_accounts().await?;
        let account = accounts.first().copied().ok_or(ClientError::UserRejected)?;
        let session = WalletSession::new(account, self.wallet.signer(&account)?);

        let auction = Arc::new(self.contracts.auction(&session, self.options.auction)?);
        let snapshot = self.read_state(&session, auction.as_ref()).await?;

        log::info!(
            "connected {account} to auction {} (item {}, sold={})",
            self.options.auction,
            snapshot.item.token_id,
            snapshot.sold
        );
        self.view
            .send_replace(AuctionView::connected(account, snapshot.metadata, snapshot.sold));
        self.connection = Some(Connection {
            session: session.clone(),
            auction,
            poller: None,
        });

        self.poll_price(self.options.poll_interval).await?;
        Ok(session)
    }

    /// Re-read sold status and item metadata into the view.
    pub async fn load_auction_state(&self) -> Result<AuctionSnapshot, ClientError> {
        let connection = self.connection.as_ref().ok_or(ClientError::NotConnected)?;
        let snapshot = self
            .read_state(&connection.session, connection.auction.as_ref())
            .await?;

        let (metadata, sold) = (snapshot.metadata.clone(), snapshot.sold);
        replace_view(&self.view, |current| current.with_state(metadata, sold));
        Ok(snapshot)
    }

    /// (Re)start polling the price every `interval` while connected.
    pub async fn poll_price(&mut self, interval: Duration) -> Result<(), ClientError> {
        let connection = self.connection.as_mut().ok_or(ClientError::NotConnected)?;
        if let Some(previous) = connection.poller.take() {
            previous.stop().await;
        }

        let view = self.view.clone();
        let poller = PricePoller::spawn(connection.auction.clone(), interval, move |price| {
            replace_view(&view, |current| current.with_price(price));
        });
        connection.poller = Some(poller);

        log::debug!("polling price every {interval:?}");
        Ok(())
    }

    /// Submit a purchase paying `amount` lamports, then refresh the sold flag.
    ///
    /// Failures leave the view untouched; there is no automatic retry. Once the
    /// purchase has confirmed the call succeeds even if the refresh fails, since a
    /// confirmed `buy` always leaves the auction sold.
    pub async fn purchase(&self, amount: u64) -> Result<Signature, ClientError> {
        let connection = self.connection.as_ref().ok_or(ClientError::NotConnected)?;

        let signature = match connection.auction.buy(amount).await {
            Ok(signature) => signature,
            Err(err) => {
                log::warn!("purchase paying {amount} lamports failed: {err}");
                return Err(err);
            }
        };

        let sold = match connection.auction.sold().await {
            Ok(sold) => sold,
            Err(err) => {
                log::warn!("purchase {signature} confirmed but sold flag unreadable: {err}");
                true
            }
        };
        replace_view(&self.view, |current| current.with_sold(sold));
        log::info!("purchase confirmed: {signature} (sold={sold})");
        Ok(signature)
    }

    /// Pay the last price shown, as the buy button does
    pub async fn purchase_at_displayed_price(&self) -> Result<Signature, ClientError> {
        if self.connection.is_none() {
            return Err(ClientError::NotConnected);
        }
        let price = self.view.borrow().price().ok_or(ClientError::PriceUnavailable)?;
        self.purchase(price).await
    }

    /// Stop polling, drop the contract handle and show the disconnected view.
    pub async fn disconnect(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            if let Some(poller) = connection.poller.take() {
                poller.stop().await;
            }
            log::info!("disconnected {}", connection.session.account());
        }
        replace_view(&self.view, |_| AuctionView::Disconnected);
    }

    async fn read_state(
        &self,
        session: &WalletSession,
        auction: &F::Auction,
    ) -> Result<AuctionSnapshot, ClientError> {
        let (sold, item) = tokio::try_join!(auction.sold(), auction.nft())?;

        let metadata = match self.read_metadata(session, item).await {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                log::warn!("metadata for item {} unavailable: {err}", item.token_id);
                None
            }
        };

        Ok(AuctionSnapshot { item, sold, metadata })
    }

    async fn read_metadata(
        &self,
        session: &WalletSession,
        item: ItemRef,
    ) -> Result<ItemMetadata, ClientError> {
        let contract = self.contracts.item(session, item.collection)?;
        let uri = contract.token_uri(item.token_id).await?;
        self.metadata.fetch(&uri).await
    }
}

/// Swap in the next view, notifying subscribers only when it differs
fn replace_view(view: &watch::Sender<AuctionView>, next: impl FnOnce(&AuctionView) -> AuctionView) {
    view.send_if_modified(|current| {
        let replacement = next(current);
        if replacement == *current {
            return false;
        }
        *current = replacement;
        true
    });
}
