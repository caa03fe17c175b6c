use anchor_lang::prelude::*;
use crate::{events::PriceQuoted, state::Auction};

#[derive(Accounts)]
pub struct GetPrice<'info> {
    pub auction: Account<'info, Auction>,
}

pub fn handler(ctx: Context<GetPrice>) -> Result<u64> {
    let auction = &ctx.accounts.auction;
    let now = Clock::get()?.unix_timestamp;
    let price = auction.schedule.price_at(now);

    emit!(PriceQuoted {
        auction: auction.key(),
        price,
        timestamp: now,
    });

    Ok(price)
}
