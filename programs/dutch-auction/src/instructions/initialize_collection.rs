use anchor_lang::prelude::*;
use crate::state::{Collection, COLLECTION_SEED, MAX_NAME_LEN, MAX_SYMBOL_LEN};
use crate::error::DutchAuctionError;

#[derive(Accounts)]
pub struct InitializeCollection<'info> {
    #[account(
        init,
        payer = authority,
        space = Collection::LEN,
        seeds = [COLLECTION_SEED, authority.key().as_ref()],
        bump
    )]
    pub collection: Account<'info, Collection>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeCollection>,
    name: String,
    symbol: String,
) -> Result<()> {
    require!(name.len() <= MAX_NAME_LEN, DutchAuctionError::MetadataTooLong);
    require!(symbol.len() <= MAX_SYMBOL_LEN, DutchAuctionError::MetadataTooLong);

    let collection = &mut ctx.accounts.collection;
    collection.authority = ctx.accounts.authority.key();
    collection.name = name;
    collection.symbol = symbol;
    collection.next_token_id = 0;
    collection.bump = ctx.bumps.collection;

    msg!(
        "Collection initialized: authority={}, name={}, symbol={}",
        collection.authority,
        collection.name,
        collection.symbol
    );
    Ok(())
}
