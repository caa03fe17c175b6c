use anchor_lang::prelude::*;

pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;

declare_id!("3DMhNdR8EXgMdiHN68xUB3Nic1J9H9kFUdMoteouxWXZ");

#[program]
pub mod dutch_auction {
    use super::*;

    /// Create the item collection owned by the signing authority
    pub fn initialize_collection(
        ctx: Context<InitializeCollection>,
        name: String,
        symbol: String,
    ) -> Result<()> {
        initialize_collection::handler(ctx, name, symbol)
    }

    /// Mint the next item of the collection to `recipient`
    pub fn award_item(ctx: Context<AwardItem>, uri: String) -> Result<()> {
        award_item::handler(ctx, uri)
    }

    /// Let `spender` move the caller's item (one token)
    pub fn approve_item(ctx: Context<ApproveItem>) -> Result<()> {
        approve_item::handler(ctx)
    }

    /// Start a descending price auction for an item the seller holds
    pub fn create_auction(
        ctx: Context<CreateAuction>,
        token_id: u64,
        initial_price: u64,
        discount_rate: u64,
        floor_price: u64,
        duration: i64,
    ) -> Result<()> {
        create_auction::handler(
            ctx,
            token_id,
            initial_price,
            discount_rate,
            floor_price,
            duration,
        )
    }

    /// Current price in lamports, returned to the caller
    pub fn get_price(ctx: Context<GetPrice>) -> Result<u64> {
        get_price::handler(ctx)
    }

    /// Purchase the item, paying at most `payment` lamports
    pub fn buy(ctx: Context<Buy>, payment: u64) -> Result<()> {
        buy::handler(ctx, payment)
    }

    /// Seller collects the sale proceeds
    pub fn withdraw_proceeds(ctx: Context<WithdrawProceeds>) -> Result<()> {
        withdraw_proceeds::handler(ctx)
    }
}
