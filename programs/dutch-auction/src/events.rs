use anchor_lang::prelude::*;

#[event]
pub struct ItemAwarded {
    pub collection: Pubkey,
    pub token_id: u64,
    pub mint: Pubkey,
    pub recipient: Pubkey,
    pub uri: String,
}

#[event]
pub struct ItemApproved {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub spender: Pubkey,
}

#[event]
pub struct AuctionCreated {
    pub auction: Pubkey,
    pub seller: Pubkey,
    pub mint: Pubkey,
    pub start_ts: i64,
    pub initial_price: u64,
    pub discount_rate: u64,
    pub floor_price: u64,
    pub duration: i64,
}

#[event]
pub struct PriceQuoted {
    pub auction: Pubkey,
    pub price: u64,
    pub timestamp: i64,
}

#[event]
pub struct Purchased {
    pub auction: Pubkey,
    pub buyer: Pubkey,
    pub price: u64,
    pub refund: u64,
}

#[event]
pub struct ProceedsWithdrawn {
    pub auction: Pubkey,
    pub seller: Pubkey,
    pub amount: u64,
}
