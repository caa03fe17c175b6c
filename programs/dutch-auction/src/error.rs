use anchor_lang::prelude::*;

#[error_code]
pub enum DutchAuctionError {
    #[msg("Auction ended")]
    AuctionEnded,

    #[msg("Payment below current price")]
    InsufficientPayment,

    #[msg("Auction already sold")]
    AlreadySold,

    #[msg("Invalid price configuration")]
    InvalidPrice,

    #[msg("Duration must be positive")]
    InvalidDuration,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Token account does not contain exactly 1 item")]
    InvalidTokenAmount,

    #[msg("Item does not match auction")]
    ItemMismatch,

    #[msg("Auction is not approved to transfer the item")]
    NotApproved,

    #[msg("Only the seller can perform this action")]
    UnauthorizedSeller,

    #[msg("Only the collection authority can perform this action")]
    UnauthorizedAuthority,

    #[msg("Auction has not been sold")]
    NotSold,

    #[msg("No proceeds to withdraw")]
    NothingToWithdraw,

    #[msg("Name, symbol or uri too long")]
    MetadataTooLong,
}

impl DutchAuctionError {
    pub const ALL: [DutchAuctionError; 14] = [
        DutchAuctionError::AuctionEnded,
        DutchAuctionError::InsufficientPayment,
        DutchAuctionError::AlreadySold,
        DutchAuctionError::InvalidPrice,
        DutchAuctionError::InvalidDuration,
        DutchAuctionError::ArithmeticOverflow,
        DutchAuctionError::InvalidTokenAmount,
        DutchAuctionError::ItemMismatch,
        DutchAuctionError::NotApproved,
        DutchAuctionError::UnauthorizedSeller,
        DutchAuctionError::UnauthorizedAuthority,
        DutchAuctionError::NotSold,
        DutchAuctionError::NothingToWithdraw,
        DutchAuctionError::MetadataTooLong,
    ];

    /// Look up the error behind a custom program error code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|err| u32::from(*err) == code)
    }
}
