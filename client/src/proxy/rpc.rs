use std::sync::Arc;

use anchor_client::{
    solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSimulateTransactionConfig},
    solana_sdk::{
        commitment_config::CommitmentConfig,
        instruction::Instruction,
        program_option::COption,
        pubkey::Pubkey,
        signature::{Keypair, Signature},
        system_program, sysvar,
        transaction::Transaction,
    },
    Client, Cluster, Program,
};
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::{
    associated_token::{self, get_associated_token_address},
    token::{self, TokenAccount},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dutch_auction::{accounts, instruction, state::{Auction, Collection, Item}};
use mpl_token_metadata::accounts::Metadata;

use super::{AuctionContract, ContractFactory, ItemContract, ItemRef};
use crate::error::ClientError;
use crate::wallet::WalletSession;

/// Contract handles backed by a cluster RPC endpoint
#[derive(Clone)]
pub struct RpcContracts {
    cluster: Cluster,
    program_id: Pubkey,
    commitment: CommitmentConfig,
    rpc: Arc<RpcClient>,
}

impl RpcContracts {
    pub fn new(cluster: Cluster, program_id: Pubkey, commitment: CommitmentConfig) -> Self {
        let rpc = RpcClient::new_with_commitment(cluster.url().to_string(), commitment);
        Self {
            cluster,
            program_id,
            commitment,
            rpc: Arc::new(rpc),
        }
    }

    pub fn program(&self, session: &WalletSession) -> Result<Program<Arc<Keypair>>, ClientError> {
        let client = Client::new_with_options(self.cluster.clone(), session.signer(), self.commitment);
        Ok(client.program(self.program_id)?)
    }
}

impl ContractFactory for RpcContracts {
    type Auction = RpcAuction;
    type Item = RpcItem;

    fn auction(&self, session: &WalletSession, address: Pubkey) -> Result<RpcAuction, ClientError> {
        Ok(RpcAuction {
            program: self.program(session)?,
            rpc: self.rpc.clone(),
            address,
        })
    }

    fn item(&self, session: &WalletSession, collection: Pubkey) -> Result<RpcItem, ClientError> {
        Ok(RpcItem {
            program: self.program(session)?,
            rpc: self.rpc.clone(),
            collection,
        })
    }
}

pub struct RpcAuction {
    program: Program<Arc<Keypair>>,
    rpc: Arc<RpcClient>,
    address: Pubkey,
}

impl RpcAuction {
    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub async fn state(&self) -> Result<Auction, ClientError> {
        Ok(self.program.account::<Auction>(self.address).await?)
    }

    /// Seller pulls the retained price out of a sold auction
    pub async fn withdraw_proceeds(&self) -> Result<Signature, ClientError> {
        let signature = self
            .program
            .request()
            .accounts(accounts::WithdrawProceeds {
                auction: self.address,
                seller: self.program.payer(),
            })
            .args(instruction::WithdrawProceeds {})
            .send()
            .await?;
        log::info!("proceeds withdrawn from {}: {signature}", self.address);
        Ok(signature)
    }
}

impl AuctionContract for RpcAuction {
    async fn get_price(&self) -> Result<u64, ClientError> {
        let ix = Instruction {
            program_id: self.program.id(),
            accounts: accounts::GetPrice {
                auction: self.address,
            }
            .to_account_metas(None),
            data: instruction::GetPrice {}.data(),
        };
        let tx = Transaction::new_with_payer(&[ix], Some(&self.program.payer()));
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            ..RpcSimulateTransactionConfig::default()
        };

        let simulation = self.rpc.simulate_transaction_with_config(&tx, config).await?.value;
        if let Some(err) = simulation.err {
            return Err(ClientError::from_transaction_error(err));
        }
        let return_data = simulation
            .return_data
            .ok_or_else(|| ClientError::Network("get_price returned no data".to_string()))?;
        decode_u64(&return_data.data.0)
    }

    async fn sold(&self) -> Result<bool, ClientError> {
        Ok(self.state().await?.sold)
    }

    async fn nft(&self) -> Result<ItemRef, ClientError> {
        let auction = self.state().await?;
        Ok(ItemRef {
            collection: auction.collection,
            token_id: auction.token_id,
        })
    }

    async fn buy(&self, payment: u64) -> Result<Signature, ClientError> {
        let auction = self.state().await?;
        let buyer = self.program.payer();

        let signature = self
            .program
            .request()
            .accounts(accounts::Buy {
                auction: self.address,
                buyer,
                seller_token_account: auction.seller_token_account,
                mint: auction.mint,
                buyer_token_account: get_associated_token_address(&buyer, &auction.mint),
                system_program: system_program::ID,
                token_program: token::ID,
                associated_token_program: associated_token::ID,
            })
            .args(instruction::Buy { payment })
            .send()
            .await?;

        log::info!("buy landed: auction={}, payment={payment}, tx={signature}", self.address);
        Ok(signature)
    }
}

pub struct RpcItem {
    program: Program<Arc<Keypair>>,
    rpc: Arc<RpcClient>,
    collection: Pubkey,
}

impl RpcItem {
    pub fn collection(&self) -> Pubkey {
        self.collection
    }

    pub async fn item(&self, token_id: u64) -> Result<Item, ClientError> {
        let (address, _) = Item::address(&self.collection, token_id);
        Ok(self.program.account::<Item>(address).await?)
    }

    /// Token account currently holding the item
    async fn holder(&self, token_id: u64) -> Result<TokenAccount, ClientError> {
        let mint = self.item(token_id).await?.mint;
        let holder = self
            .rpc
            .get_token_largest_accounts(&mint)
            .await?
            .into_iter()
            .find(|balance| balance.amount.amount == "1")
            .ok_or_else(|| ClientError::Network(format!("item {token_id} has no holder")))?;
        let address: Pubkey = holder
            .address
            .parse()
            .map_err(|_| ClientError::Network(format!("bad token account {}", holder.address)))?;

        let data = self.rpc.get_account_data(&address).await?;
        TokenAccount::try_deserialize(&mut data.as_slice())
            .map_err(|err| ClientError::Network(err.to_string()))
    }

    /// Mint the next item to `to`; returns its token id
    pub async fn award_item(&self, to: Pubkey, uri: &str) -> Result<u64, ClientError> {
        let collection = self.program.account::<Collection>(self.collection).await?;
        let token_id = collection.next_token_id;
        let (mint, _) = Item::mint_address(&self.collection, token_id);
        let (metadata, _) = Metadata::find_pda(&mint);

        let signature = self
            .program
            .request()
            .accounts(accounts::AwardItem {
                collection: self.collection,
                item: Item::address(&self.collection, token_id).0,
                mint,
                recipient: to,
                recipient_token_account: get_associated_token_address(&to, &mint),
                metadata,
                authority: self.program.payer(),
                token_metadata_program: mpl_token_metadata::ID,
                system_program: system_program::ID,
                token_program: token::ID,
                associated_token_program: associated_token::ID,
                rent: sysvar::rent::ID,
            })
            .args(instruction::AwardItem {
                uri: uri.to_string(),
            })
            .send()
            .await?;

        log::info!("item {token_id} awarded to {to}: mint={mint}, tx={signature}");
        Ok(token_id)
    }

    /// Approve `spender` to move the caller's item
    pub async fn approve(&self, spender: Pubkey, token_id: u64) -> Result<Signature, ClientError> {
        let owner = self.program.payer();
        let mint = self.item(token_id).await?.mint;

        let signature = self
            .program
            .request()
            .accounts(accounts::ApproveItem {
                collection: self.collection,
                item: Item::address(&self.collection, token_id).0,
                owner_token_account: get_associated_token_address(&owner, &mint),
                spender,
                owner,
                token_program: token::ID,
            })
            .args(instruction::ApproveItem {})
            .send()
            .await?;

        log::info!("item {token_id} approved for {spender}: tx={signature}");
        Ok(signature)
    }
}

impl ItemContract for RpcItem {
    async fn token_uri(&self, token_id: u64) -> Result<String, ClientError> {
        let mint = self.item(token_id).await?.mint;
        let (address, _) = Metadata::find_pda(&mint);
        let data = self.rpc.get_account_data(&address).await?;
        let metadata = Metadata::safe_deserialize(&data)
            .map_err(|err| ClientError::Network(format!("bad metadata account {address}: {err}")))?;
        Ok(metadata.uri.trim_end_matches('\0').to_string())
    }

    async fn owner_of(&self, token_id: u64) -> Result<Pubkey, ClientError> {
        Ok(self.holder(token_id).await?.owner)
    }

    async fn get_approved(&self, token_id: u64) -> Result<Option<Pubkey>, ClientError> {
        let holder = self.holder(token_id).await?;
        Ok(match holder.delegate {
            COption::Some(delegate) if holder.delegated_amount > 0 => Some(delegate),
            _ => None,
        })
    }
}

/// Decode a borsh `u64` from base64 return data; the runtime drops trailing zero bytes
fn decode_u64(encoded: &str) -> Result<u64, ClientError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| ClientError::Network(format!("bad return data: {err}")))?;
    if bytes.len() > 8 {
        return Err(ClientError::Network(format!(
            "return data too long: {} bytes",
            bytes.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(&bytes);
    Ok(u64::from_le_bytes(buf))
}
