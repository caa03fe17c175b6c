use anchor_client::solana_sdk::commitment_config::CommitmentConfig;
use dutch_auction_client::config::Settings;
use dutch_auction_client::metadata::HttpMetadataSource;
use dutch_auction_client::proxy::{ContractFactory, RpcContracts};
use dutch_auction_client::ui;
use dutch_auction_client::wallet::{KeypairWallet, WalletProvider, WalletSession};
use dutch_auction_client::{AuctionClient, ClientError, ClientOptions};
use eyre::{bail, Result};

const USAGE: &str = "usage: auction [watch|buy|withdraw]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Render the auction until Ctrl-C
    Watch,
    /// Watch, and buy at the first price shown
    Buy,
    /// Seller collects the proceeds of a sold auction
    Withdraw,
}

#[tokio::main]
async fn main() -> Result<()> {
    solana_logger::setup_with_default("info");

    let command = match std::env::args().nth(1).as_deref() {
        None | Some("watch") => Command::Watch,
        Some("buy") => Command::Buy,
        Some("withdraw") => Command::Withdraw,
        Some(other) => bail!("unknown command {other:?}; {USAGE}"),
    };

    let settings = Settings::from_env()?;
    let auction = settings.auction()?;
    let contracts = RpcContracts::new(
        settings.cluster.clone(),
        settings.program_id,
        CommitmentConfig::confirmed(),
    );
    let wallet = KeypairWallet::new(settings.wallet.clone());

    if command == Command::Withdraw {
        let account = wallet
            .request_accounts()
            .await?
            .first()
            .copied()
            .ok_or(ClientError::UserRejected)?;
        let session = WalletSession::new(account, wallet.signer(&account)?);
        let signature = contracts.auction(&session, auction)?.withdraw_proceeds().await?;
        println!("Proceeds withdrawn: {signature}");
        return Ok(());
    }

    let options = ClientOptions {
        auction,
        poll_interval: settings.poll_interval,
    };
    let mut client = AuctionClient::new(wallet, contracts, HttpMetadataSource::new()?, options);
    let mut views = client.subscribe();
    print!("{}", ui::render(&views.borrow_and_update()));

    if let Err(err) = client.connect().await {
        println!("{}", ui::notify(&err));
        return Err(err.into());
    }

    let mut pending_buy = command == Command::Buy;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                print!("{}", ui::render(&view));

                if pending_buy && view.price().is_some() {
                    pending_buy = false;
                    match client.purchase_at_displayed_price().await {
                        Ok(signature) => println!("Purchased: {signature}"),
                        Err(err) => println!("{}", ui::notify(&err)),
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    client.disconnect().await;
    Ok(())
}
