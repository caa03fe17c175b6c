use dutch_auction_client::config::DeploySettings;
use dutch_auction_client::deploy::deploy;
use dutch_auction_client::wallet::{KeypairWallet, WalletProvider, WalletSession};
use dutch_auction_client::ClientError;
use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    solana_logger::setup_with_default("info");

    let settings = DeploySettings::from_env()?;
    log::info!(
        "deploying to {} with program {}",
        settings.settings.cluster,
        settings.settings.program_id
    );

    let wallet = KeypairWallet::new(settings.settings.wallet.clone());
    let account = wallet
        .request_accounts()
        .await?
        .first()
        .copied()
        .ok_or(ClientError::UserRejected)?;
    let session = WalletSession::new(account, wallet.signer(&account)?);

    let deployment = deploy(&settings, &session).await?;

    println!("collection: {}", deployment.collection);
    println!("token id:   {}", deployment.token_id);
    println!("mint:       {}", deployment.mint);
    println!("auction:    {}", deployment.auction);
    println!("export AUCTION_ADDRESS={}", deployment.auction);
    Ok(())
}
