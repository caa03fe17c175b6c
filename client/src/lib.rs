//! Off-chain side of the Dutch auction: contract proxies, wallet session,
//! price polling, the view model and its terminal rendering.

pub mod client;
pub mod config;
pub mod deploy;
pub mod error;
pub mod metadata;
pub mod poller;
pub mod proxy;
pub mod ui;
pub mod view;
pub mod wallet;

pub use client::{AuctionClient, AuctionSnapshot, ClientOptions};
pub use error::ClientError;
pub use view::{AuctionView, ConnectedView};
