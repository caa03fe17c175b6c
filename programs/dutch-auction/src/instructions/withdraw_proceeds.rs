use anchor_lang::prelude::*;
use crate::state::{Auction, AUCTION_SEED};
use crate::events::ProceedsWithdrawn;
use crate::error::DutchAuctionError;

/// Seller collects the price retained by a sold auction
#[derive(Accounts)]
pub struct WithdrawProceeds<'info> {
    #[account(
        mut,
        seeds = [AUCTION_SEED, auction.collection.as_ref(), &auction.token_id.to_le_bytes()],
        bump = auction.bump,
        has_one = seller @ DutchAuctionError::UnauthorizedSeller
    )]
    pub auction: Account<'info, Auction>,

    #[account(mut)]
    pub seller: Signer<'info>,
}

pub fn handler(ctx: Context<WithdrawProceeds>) -> Result<()> {
    let auction = &ctx.accounts.auction;
    require!(auction.sold, DutchAuctionError::NotSold);

    let amount = auction.proceeds;
    require!(amount > 0, DutchAuctionError::NothingToWithdraw);

    let auction_info = ctx.accounts.auction.to_account_info();
    let seller_info = ctx.accounts.seller.to_account_info();

    // Rent-exempt reserve stays behind; only the proceeds move
    let auction_balance = auction_info.lamports();
    let seller_balance = seller_info.lamports();
    **auction_info.try_borrow_mut_lamports()? = auction_balance
        .checked_sub(amount)
        .ok_or(DutchAuctionError::ArithmeticOverflow)?;
    **seller_info.try_borrow_mut_lamports()? = seller_balance
        .checked_add(amount)
        .ok_or(DutchAuctionError::ArithmeticOverflow)?;

    let auction = &mut ctx.accounts.auction;
    auction.proceeds = 0;

    msg!(
        "Proceeds withdrawn: seller={}, amount={}",
        auction.seller,
        amount
    );

    emit!(ProceedsWithdrawn {
        auction: auction.key(),
        seller: auction.seller,
        amount,
    });

    Ok(())
}
