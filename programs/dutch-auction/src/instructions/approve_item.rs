use anchor_lang::prelude::*;
use anchor_spl::token::{self, Approve, Token, TokenAccount};
use crate::state::{Collection, Item, ITEM_SEED};
use crate::events::ItemApproved;
use crate::error::DutchAuctionError;

/// Holder approves `spender` as delegate for the single item token
#[derive(Accounts)]
pub struct ApproveItem<'info> {
    pub collection: Account<'info, Collection>,

    #[account(
        seeds = [ITEM_SEED, collection.key().as_ref(), &item.token_id.to_le_bytes()],
        bump = item.bump
    )]
    pub item: Account<'info, Item>,

    #[account(
        mut,
        constraint = owner_token_account.owner == owner.key() @ DutchAuctionError::UnauthorizedSeller,
        constraint = owner_token_account.mint == item.mint @ DutchAuctionError::ItemMismatch,
        constraint = owner_token_account.amount == 1 @ DutchAuctionError::InvalidTokenAmount
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    /// CHECK: any account may be approved, usually an auction PDA
    pub spender: UncheckedAccount<'info>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<ApproveItem>) -> Result<()> {
    let cpi_accounts = Approve {
        to: ctx.accounts.owner_token_account.to_account_info(),
        delegate: ctx.accounts.spender.to_account_info(),
        authority: ctx.accounts.owner.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::approve(cpi_ctx, 1)?;

    msg!(
        "Item approved: mint={}, owner={}, spender={}",
        ctx.accounts.item.mint,
        ctx.accounts.owner.key(),
        ctx.accounts.spender.key()
    );

    emit!(ItemApproved {
        mint: ctx.accounts.item.mint,
        owner: ctx.accounts.owner.key(),
        spender: ctx.accounts.spender.key(),
    });

    Ok(())
}
