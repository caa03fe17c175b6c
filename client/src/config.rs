use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anchor_client::solana_sdk::pubkey::Pubkey;
use anchor_client::Cluster;
use thiserror::Error;

use crate::poller::DEFAULT_POLL_INTERVAL;

pub const CLUSTER_VAR: &str = "AUCTION_CLUSTER";
pub const WALLET_VAR: &str = "AUCTION_WALLET";
pub const ANCHOR_WALLET_VAR: &str = "ANCHOR_WALLET";
pub const PROGRAM_ID_VAR: &str = "AUCTION_PROGRAM_ID";
pub const ADDRESS_VAR: &str = "AUCTION_ADDRESS";
pub const POLL_INTERVAL_VAR: &str = "AUCTION_POLL_INTERVAL_MS";

pub const COLLECTION_NAME_VAR: &str = "AUCTION_COLLECTION_NAME";
pub const COLLECTION_SYMBOL_VAR: &str = "AUCTION_COLLECTION_SYMBOL";
pub const METADATA_URI_VAR: &str = "AUCTION_METADATA_URI";
pub const INITIAL_PRICE_VAR: &str = "AUCTION_INITIAL_PRICE";
pub const DISCOUNT_RATE_VAR: &str = "AUCTION_DISCOUNT_RATE";
pub const FLOOR_PRICE_VAR: &str = "AUCTION_FLOOR_PRICE";
pub const DURATION_VAR: &str = "AUCTION_DURATION_SECS";

/// 7 days
pub const DEFAULT_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Connection settings shared by the front end and the deploy binary
#[derive(Debug, Clone)]
pub struct Settings {
    pub cluster: Cluster,
    pub wallet: PathBuf,
    pub program_id: Pubkey,
    /// Auction account; only the front end needs it
    pub auction: Option<Pubkey>,
    pub poll_interval: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cluster = match lookup(CLUSTER_VAR) {
            Some(value) => parse(CLUSTER_VAR, value)?,
            None => Cluster::Localnet,
        };

        let wallet = lookup(WALLET_VAR)
            .or_else(|| lookup(ANCHOR_WALLET_VAR))
            .map(PathBuf::from)
            .unwrap_or_else(|| default_wallet(lookup("HOME")));

        let program_id = match lookup(PROGRAM_ID_VAR) {
            Some(value) => parse(PROGRAM_ID_VAR, value)?,
            None => dutch_auction::ID,
        };

        let auction = lookup(ADDRESS_VAR)
            .map(|value| parse(ADDRESS_VAR, value))
            .transpose()?;

        let poll_interval = match lookup(POLL_INTERVAL_VAR) {
            Some(value) => Duration::from_millis(positive(POLL_INTERVAL_VAR, value)?),
            None => DEFAULT_POLL_INTERVAL,
        };

        Ok(Self {
            cluster,
            wallet,
            program_id,
            auction,
            poll_interval,
        })
    }

    pub fn auction(&self) -> Result<Pubkey, ConfigError> {
        self.auction.ok_or(ConfigError::Missing(ADDRESS_VAR))
    }
}

/// Collection and auction parameters for a deployment
#[derive(Debug, Clone)]
pub struct DeploySettings {
    pub settings: Settings,
    pub collection_name: String,
    pub collection_symbol: String,
    pub metadata_uri: String,
    /// Lamports
    pub initial_price: u64,
    /// Lamports per second
    pub discount_rate: u64,
    /// Lamports
    pub floor_price: u64,
    pub duration: i64,
}

impl DeploySettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let settings = Settings::from_lookup(&lookup)?;
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));

        let duration = match lookup(DURATION_VAR) {
            Some(value) => {
                let secs = positive(DURATION_VAR, value.clone())?;
                i64::try_from(secs).map_err(|_| ConfigError::Invalid { var: DURATION_VAR, value })?
            }
            None => DEFAULT_DURATION_SECS,
        };

        Ok(Self {
            settings,
            collection_name: lookup(COLLECTION_NAME_VAR).unwrap_or_else(|| "Dutch Auction Items".to_string()),
            collection_symbol: lookup(COLLECTION_SYMBOL_VAR).unwrap_or_else(|| "DAI".to_string()),
            metadata_uri: required(METADATA_URI_VAR)?,
            initial_price: parse(INITIAL_PRICE_VAR, required(INITIAL_PRICE_VAR)?)?,
            discount_rate: parse(DISCOUNT_RATE_VAR, required(DISCOUNT_RATE_VAR)?)?,
            floor_price: match lookup(FLOOR_PRICE_VAR) {
                Some(value) => parse(FLOOR_PRICE_VAR, value)?,
                None => 0,
            },
            duration,
        })
    }
}

fn parse<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { var, value })
}

fn positive(var: &'static str, value: String) -> Result<u64, ConfigError> {
    match parse::<u64>(var, value.clone())? {
        0 => Err(ConfigError::Invalid { var, value }),
        n => Ok(n),
    }
}

fn default_wallet(home: Option<String>) -> PathBuf {
    let mut path = home.map(PathBuf::from).unwrap_or_default();
    path.push(".config/solana/id.json");
    path
}
