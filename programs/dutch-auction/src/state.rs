use anchor_lang::prelude::*;
use crate::error::DutchAuctionError;

pub const COLLECTION_SEED: &[u8] = b"collection";
pub const ITEM_SEED: &[u8] = b"item";
pub const ITEM_MINT_SEED: &[u8] = b"item_mint";
pub const AUCTION_SEED: &[u8] = b"auction";

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;

/// Item collection (the "NFT contract")
/// Seeds: [b"collection", authority]
#[account]
pub struct Collection {
    pub authority: Pubkey,       // Only signer allowed to award items
    pub name: String,
    pub symbol: String,
    pub next_token_id: u64,      // Token id of the next awarded item
    pub bump: u8,
}

impl Collection {
    pub const LEN: usize = 8 +   // discriminator
        32 +                      // authority
        4 + MAX_NAME_LEN +        // name
        4 + MAX_SYMBOL_LEN +      // symbol
        8 +                       // next_token_id
        1;                        // bump

    pub fn address(authority: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[COLLECTION_SEED, authority.as_ref()], &crate::ID)
    }
}

/// One minted item; its uri lives in the Metaplex metadata of `mint`
/// Seeds: [b"item", collection, token_id]
#[account]
pub struct Item {
    pub collection: Pubkey,
    pub token_id: u64,
    pub mint: Pubkey,
    pub bump: u8,
}

impl Item {
    pub const LEN: usize = 8 +   // discriminator
        32 +                      // collection
        8 +                       // token_id
        32 +                      // mint
        1;                        // bump

    pub fn address(collection: &Pubkey, token_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[ITEM_SEED, collection.as_ref(), &token_id.to_le_bytes()],
            &crate::ID,
        )
    }

    pub fn mint_address(collection: &Pubkey, token_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[ITEM_MINT_SEED, collection.as_ref(), &token_id.to_le_bytes()],
            &crate::ID,
        )
    }
}

/// Single item Dutch auction
/// Seeds: [b"auction", collection, token_id]
/// The NFT stays with the seller until sold; the auction PDA is its approved delegate
#[account]
pub struct Auction {
    pub seller: Pubkey,
    pub collection: Pubkey,
    pub token_id: u64,
    pub mint: Pubkey,
    pub seller_token_account: Pubkey,
    pub schedule: PriceSchedule,
    pub sold: bool,
    pub buyer: Pubkey,           // Default until sold
    pub proceeds: u64,           // Lamports retained for the seller
    pub bump: u8,
}

impl Auction {
    pub const LEN: usize = 8 +   // discriminator
        32 +                      // seller
        32 +                      // collection
        8 +                       // token_id
        32 +                      // mint
        32 +                      // seller_token_account
        PriceSchedule::LEN +
        1 +                       // sold
        32 +                      // buyer
        8 +                       // proceeds
        1;                        // bump

    pub fn address(collection: &Pubkey, token_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[AUCTION_SEED, collection.as_ref(), &token_id.to_le_bytes()],
            &crate::ID,
        )
    }

    pub fn phase(&self, now: i64) -> AuctionPhase {
        self.schedule.phase(self.sold, now)
    }

    pub fn settle(&self, now: i64, payment: u64) -> std::result::Result<Settlement, DutchAuctionError> {
        self.schedule.settle(self.sold, now, payment)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceSchedule {
    pub start_ts: i64,
    pub initial_price: u64,
    pub discount_rate: u64,       // Lamports per second
    pub floor_price: u64,
    pub duration: i64,            // Seconds
}

impl PriceSchedule {
    pub const LEN: usize = 8 +   // start_ts
        8 +                       // initial_price
        8 +                       // discount_rate
        8 +                       // floor_price
        8;                        // duration

    pub fn new(
        start_ts: i64,
        initial_price: u64,
        discount_rate: u64,
        floor_price: u64,
        duration: i64,
    ) -> std::result::Result<Self, DutchAuctionError> {
        if initial_price == 0 || initial_price < floor_price {
            return Err(DutchAuctionError::InvalidPrice);
        }
        if duration <= 0 {
            return Err(DutchAuctionError::InvalidDuration);
        }
        start_ts
            .checked_add(duration)
            .ok_or(DutchAuctionError::ArithmeticOverflow)?;

        Ok(Self {
            start_ts,
            initial_price,
            discount_rate,
            floor_price,
            duration,
        })
    }

    /// First timestamp at which the auction no longer accepts purchases
    pub fn ends_at(&self) -> i64 {
        self.start_ts.saturating_add(self.duration)
    }

    /// Linear decay: initial - rate * elapsed, never below the floor
    pub fn price_at(&self, now: i64) -> u64 {
        let elapsed = now.saturating_sub(self.start_ts).max(0) as u64;
        let discount = self.discount_rate.saturating_mul(elapsed);
        self.initial_price
            .saturating_sub(discount)
            .max(self.floor_price)
    }

    pub fn phase(&self, sold: bool, now: i64) -> AuctionPhase {
        if sold {
            AuctionPhase::Sold
        } else if now >= self.ends_at() {
            AuctionPhase::EndedUnsold
        } else {
            AuctionPhase::Active
        }
    }

    /// Decide a purchase attempt at `now` paying `payment` lamports
    pub fn settle(
        &self,
        sold: bool,
        now: i64,
        payment: u64,
    ) -> std::result::Result<Settlement, DutchAuctionError> {
        match self.phase(sold, now) {
            AuctionPhase::Sold => return Err(DutchAuctionError::AlreadySold),
            AuctionPhase::EndedUnsold => return Err(DutchAuctionError::AuctionEnded),
            AuctionPhase::Active => {}
        }

        let price = self.price_at(now);
        if payment < price {
            return Err(DutchAuctionError::InsufficientPayment);
        }

        Ok(Settlement {
            price,
            refund: payment - price,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionPhase {
    Active,
    EndedUnsold,
    Sold,
}

/// Outcome of an accepted purchase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub price: u64,
    pub refund: u64,
}
