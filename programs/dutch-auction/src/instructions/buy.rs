use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};
use solana_program::program_option::COption;
use crate::state::{Auction, AUCTION_SEED};
use crate::events::Purchased;
use crate::error::DutchAuctionError;

#[derive(Accounts)]
pub struct Buy<'info> {
    /// Auction being settled; also receives the payment
    #[account(
        mut,
        seeds = [AUCTION_SEED, auction.collection.as_ref(), &auction.token_id.to_le_bytes()],
        bump = auction.bump,
        constraint = !auction.sold @ DutchAuctionError::AlreadySold
    )]
    pub auction: Account<'info, Auction>,

    #[account(mut)]
    pub buyer: Signer<'info>,

    /// Seller's account holding the NFT, delegated to the auction PDA
    #[account(
        mut,
        address = auction.seller_token_account @ DutchAuctionError::ItemMismatch,
        constraint = seller_token_account.delegate == COption::Some(auction.key()) @ DutchAuctionError::NotApproved,
        constraint = seller_token_account.delegated_amount >= 1 @ DutchAuctionError::NotApproved,
        constraint = seller_token_account.amount == 1 @ DutchAuctionError::InvalidTokenAmount
    )]
    pub seller_token_account: Account<'info, TokenAccount>,

    #[account(address = auction.mint @ DutchAuctionError::ItemMismatch)]
    pub mint: Account<'info, Mint>,

    /// Buyer's ATA to receive the NFT
    #[account(
        init_if_needed,
        payer = buyer,
        associated_token::mint = mint,
        associated_token::authority = buyer
    )]
    pub buyer_token_account: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

pub fn handler(ctx: Context<Buy>, payment: u64) -> Result<()> {
    let clock = Clock::get()?;
    let settlement = ctx.accounts.auction.settle(clock.unix_timestamp, payment)?;

    msg!(
        "Purchase price: {} lamports at timestamp {} (paid {})",
        settlement.price,
        clock.unix_timestamp,
        payment
    );

    let auction_info = ctx.accounts.auction.to_account_info();
    let buyer_info = ctx.accounts.buyer.to_account_info();

    // Take the full payment, then hand back whatever exceeds the price
    let cpi_accounts = system_program::Transfer {
        from: buyer_info.clone(),
        to: auction_info.clone(),
    };
    system_program::transfer(
        CpiContext::new(ctx.accounts.system_program.to_account_info(), cpi_accounts),
        payment,
    )?;

    if settlement.refund > 0 {
        let auction_balance = auction_info.lamports();
        let buyer_balance = buyer_info.lamports();
        **auction_info.try_borrow_mut_lamports()? = auction_balance
            .checked_sub(settlement.refund)
            .ok_or(DutchAuctionError::ArithmeticOverflow)?;
        **buyer_info.try_borrow_mut_lamports()? = buyer_balance
            .checked_add(settlement.refund)
            .ok_or(DutchAuctionError::ArithmeticOverflow)?;
    }

    // Move the NFT, auction PDA signing as the approved delegate
    let auction = &ctx.accounts.auction;
    let token_id = auction.token_id.to_le_bytes();
    let seeds: &[&[u8]] = &[
        AUCTION_SEED,
        auction.collection.as_ref(),
        &token_id,
        &[auction.bump],
    ];
    let signer = &[seeds];

    let cpi_accounts = Transfer {
        from: ctx.accounts.seller_token_account.to_account_info(),
        to: ctx.accounts.buyer_token_account.to_account_info(),
        authority: auction_info,
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer,
    );
    token::transfer(cpi_ctx, 1)?;

    let auction = &mut ctx.accounts.auction;
    auction.sold = true;
    auction.buyer = ctx.accounts.buyer.key();
    auction.proceeds = settlement.price;

    msg!(
        "Purchase completed: buyer={}, seller={}, price={}, refund={}",
        auction.buyer,
        auction.seller,
        settlement.price,
        settlement.refund
    );

    emit!(Purchased {
        auction: auction.key(),
        buyer: auction.buyer,
        price: settlement.price,
        refund: settlement.refund,
    });

    Ok(())
}
