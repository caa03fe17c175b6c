use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, spl_token::instruction::AuthorityType, Mint, MintTo, SetAuthority, Token, TokenAccount},
};
use mpl_token_metadata::{instructions::CreateMetadataAccountV3CpiBuilder, types::DataV2};
use crate::state::{Collection, Item, COLLECTION_SEED, ITEM_MINT_SEED, ITEM_SEED, MAX_URI_LEN};
use crate::events::ItemAwarded;
use crate::error::DutchAuctionError;

/// Mint the next item of a collection: one token, Metaplex metadata carrying the uri,
/// mint authority revoked afterwards so supply stays at 1
#[derive(Accounts)]
pub struct AwardItem<'info> {
    #[account(
        mut,
        seeds = [COLLECTION_SEED, authority.key().as_ref()],
        bump = collection.bump,
        has_one = authority @ DutchAuctionError::UnauthorizedAuthority
    )]
    pub collection: Account<'info, Collection>,

    #[account(
        init,
        payer = authority,
        space = Item::LEN,
        seeds = [ITEM_SEED, collection.key().as_ref(), &collection.next_token_id.to_le_bytes()],
        bump
    )]
    pub item: Account<'info, Item>,

    #[account(
        init,
        payer = authority,
        seeds = [ITEM_MINT_SEED, collection.key().as_ref(), &collection.next_token_id.to_le_bytes()],
        bump,
        mint::decimals = 0,
        mint::authority = collection,
        mint::freeze_authority = collection
    )]
    pub mint: Account<'info, Mint>,

    /// CHECK: any wallet may receive the item
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = mint,
        associated_token::authority = recipient
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,

    /// CHECK: created and validated by the token metadata program
    #[account(mut)]
    pub metadata: UncheckedAccount<'info>,

    #[account(mut)]
    pub authority: Signer<'info>,

    /// CHECK: address checked against the token metadata program id
    #[account(address = mpl_token_metadata::ID)]
    pub token_metadata_program: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<AwardItem>, uri: String) -> Result<()> {
    require!(uri.len() <= MAX_URI_LEN, DutchAuctionError::MetadataTooLong);

    let collection = &ctx.accounts.collection;
    let token_id = collection.next_token_id;
    let name = collection.name.clone();
    let symbol = collection.symbol.clone();
    let authority_key = collection.authority;
    let bump = collection.bump;

    let seeds: &[&[u8]] = &[COLLECTION_SEED, authority_key.as_ref(), &[bump]];
    let signer = &[seeds];

    let collection_info = ctx.accounts.collection.to_account_info();
    let mint_info = ctx.accounts.mint.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    // Mint the single token to the recipient
    let cpi_accounts = MintTo {
        mint: mint_info.clone(),
        to: ctx.accounts.recipient_token_account.to_account_info(),
        authority: collection_info.clone(),
    };
    token::mint_to(
        CpiContext::new_with_signer(token_program.clone(), cpi_accounts, signer),
        1,
    )?;

    // Metadata carries the uri the client resolves
    let metadata_program = ctx.accounts.token_metadata_program.to_account_info();
    let metadata = ctx.accounts.metadata.to_account_info();
    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let rent = ctx.accounts.rent.to_account_info();

    CreateMetadataAccountV3CpiBuilder::new(&metadata_program)
        .metadata(&metadata)
        .mint(&mint_info)
        .mint_authority(&collection_info)
        .payer(&payer)
        .update_authority(&collection_info, true)
        .system_program(&system_program)
        .rent(Some(&rent))
        .data(DataV2 {
            name,
            symbol,
            uri: uri.clone(),
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        })
        .is_mutable(false)
        .invoke_signed(signer)?;

    // Fix supply at 1
    let cpi_accounts = SetAuthority {
        current_authority: collection_info,
        account_or_mint: mint_info,
    };
    token::set_authority(
        CpiContext::new_with_signer(token_program, cpi_accounts, signer),
        AuthorityType::MintTokens,
        None,
    )?;

    let item = &mut ctx.accounts.item;
    item.collection = ctx.accounts.collection.key();
    item.token_id = token_id;
    item.mint = ctx.accounts.mint.key();
    item.bump = ctx.bumps.item;

    let collection = &mut ctx.accounts.collection;
    collection.next_token_id = token_id
        .checked_add(1)
        .ok_or(DutchAuctionError::ArithmeticOverflow)?;

    msg!(
        "Item awarded: token_id={}, mint={}, recipient={}",
        token_id,
        item.mint,
        ctx.accounts.recipient.key()
    );

    emit!(ItemAwarded {
        collection: collection.key(),
        token_id,
        mint: item.mint,
        recipient: ctx.accounts.recipient.key(),
        uri,
    });

    Ok(())
}
