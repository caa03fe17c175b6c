use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anchor_client::solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};

use crate::error::ClientError;

/// Source of user-authorized signing identities.
///
/// Production code reads a keypair file; tests inject a mock so the client never
/// needs a real wallet.
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for authorized accounts, most preferred first.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Pubkey>, ClientError>> + Send;

    /// Signer for an account previously returned by `request_accounts`.
    fn signer(&self, account: &Pubkey) -> Result<Arc<Keypair>, ClientError>;
}

/// Authorized identity for the lifetime of a connection
#[derive(Clone)]
pub struct WalletSession {
    account: Pubkey,
    signer: Arc<Keypair>,
}

impl WalletSession {
    pub fn new(account: Pubkey, signer: Arc<Keypair>) -> Self {
        Self { account, signer }
    }

    pub fn account(&self) -> Pubkey {
        self.account
    }

    pub fn signer(&self) -> Arc<Keypair> {
        self.signer.clone()
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// File system keypair, the CLI equivalent of a browser wallet
pub struct KeypairWallet {
    path: PathBuf,
}

impl KeypairWallet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Keypair, ClientError> {
        read_keypair_file(&self.path).map_err(|err| {
            log::error!("no wallet at {}: {err}", self.path.display());
            ClientError::NoWallet
        })
    }
}

impl WalletProvider for KeypairWallet {
    async fn request_accounts(&self) -> Result<Vec<Pubkey>, ClientError> {
        Ok(vec![self.load()?.pubkey()])
    }

    fn signer(&self, account: &Pubkey) -> Result<Arc<Keypair>, ClientError> {
        let keypair = self.load()?;
        if keypair.pubkey() != *account {
            return Err(ClientError::UserRejected);
        }
        Ok(Arc::new(keypair))
    }
}
