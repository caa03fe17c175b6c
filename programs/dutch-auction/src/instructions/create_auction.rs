use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;
use crate::state::{Auction, Collection, Item, PriceSchedule, AUCTION_SEED, ITEM_SEED};
use crate::events::AuctionCreated;
use crate::error::DutchAuctionError;

/// Auction starts at the current cluster time; the NFT stays in the seller's account
/// until the seller approves the auction PDA and a buyer settles
#[derive(Accounts)]
#[instruction(token_id: u64)]
pub struct CreateAuction<'info> {
    #[account(
        init,
        payer = seller,
        space = Auction::LEN,
        seeds = [AUCTION_SEED, collection.key().as_ref(), &token_id.to_le_bytes()],
        bump
    )]
    pub auction: Account<'info, Auction>,

    pub collection: Account<'info, Collection>,

    #[account(
        seeds = [ITEM_SEED, collection.key().as_ref(), &token_id.to_le_bytes()],
        bump = item.bump
    )]
    pub item: Account<'info, Item>,

    /// Seller must hold the item
    #[account(
        constraint = seller_token_account.owner == seller.key() @ DutchAuctionError::UnauthorizedSeller,
        constraint = seller_token_account.mint == item.mint @ DutchAuctionError::ItemMismatch,
        constraint = seller_token_account.amount == 1 @ DutchAuctionError::InvalidTokenAmount
    )]
    pub seller_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub seller: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CreateAuction>,
    token_id: u64,
    initial_price: u64,
    discount_rate: u64,
    floor_price: u64,
    duration: i64,
) -> Result<()> {
    let clock = Clock::get()?;
    let schedule = PriceSchedule::new(
        clock.unix_timestamp,
        initial_price,
        discount_rate,
        floor_price,
        duration,
    )?;

    let auction = &mut ctx.accounts.auction;
    auction.seller = ctx.accounts.seller.key();
    auction.collection = ctx.accounts.collection.key();
    auction.token_id = token_id;
    auction.mint = ctx.accounts.item.mint;
    auction.seller_token_account = ctx.accounts.seller_token_account.key();
    auction.schedule = schedule;
    auction.sold = false;
    auction.buyer = Pubkey::default();
    auction.proceeds = 0;
    auction.bump = ctx.bumps.auction;

    msg!(
        "Auction created: mint={}, price={} -{}/s floor={} over {}s from {}",
        auction.mint,
        initial_price,
        discount_rate,
        floor_price,
        duration,
        schedule.start_ts
    );

    emit!(AuctionCreated {
        auction: auction.key(),
        seller: auction.seller,
        mint: auction.mint,
        start_ts: schedule.start_ts,
        initial_price,
        discount_rate,
        floor_price,
        duration,
    });

    Ok(())
}
