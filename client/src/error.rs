use anchor_client::solana_client::client_error::ClientError as SolanaClientError;
use anchor_client::solana_sdk::{instruction::InstructionError, transaction::TransactionError};
use anchor_client::ClientError as AnchorClientError;
use anchor_lang::error::ErrorCode as AnchorErrorCode;
use dutch_auction::error::DutchAuctionError;
use thiserror::Error;

/// `SystemError::ResultWithNegativeLamports`, raised when the payer cannot cover a transfer.
///
/// SPL Token reports its own `InsufficientFunds` with the same code. `buy` requires the
/// delegated amount up front, so on its path code 1 only comes from the payment transfer.
const SYSTEM_INSUFFICIENT_LAMPORTS: u32 = 1;

/// Framework errors raised by account validation before any handler runs
const ANCHOR_ERRORS: [AnchorErrorCode; 27] = [
    AnchorErrorCode::InstructionMissing,
    AnchorErrorCode::InstructionFallbackNotFound,
    AnchorErrorCode::InstructionDidNotDeserialize,
    AnchorErrorCode::InstructionDidNotSerialize,
    AnchorErrorCode::ConstraintMut,
    AnchorErrorCode::ConstraintHasOne,
    AnchorErrorCode::ConstraintSigner,
    AnchorErrorCode::ConstraintRaw,
    AnchorErrorCode::ConstraintOwner,
    AnchorErrorCode::ConstraintRentExempt,
    AnchorErrorCode::ConstraintSeeds,
    AnchorErrorCode::ConstraintAssociated,
    AnchorErrorCode::ConstraintAssociatedInit,
    AnchorErrorCode::ConstraintAddress,
    AnchorErrorCode::ConstraintZero,
    AnchorErrorCode::ConstraintTokenMint,
    AnchorErrorCode::ConstraintTokenOwner,
    AnchorErrorCode::AccountDiscriminatorNotFound,
    AnchorErrorCode::AccountDiscriminatorMismatch,
    AnchorErrorCode::AccountDidNotDeserialize,
    AnchorErrorCode::AccountNotEnoughKeys,
    AnchorErrorCode::AccountNotMutable,
    AnchorErrorCode::AccountOwnedByWrongProgram,
    AnchorErrorCode::InvalidProgramId,
    AnchorErrorCode::AccountNotSigner,
    AnchorErrorCode::AccountNotInitialized,
    AnchorErrorCode::DeclaredProgramIdMismatch,
];

fn anchor_error(code: u32) -> Option<AnchorErrorCode> {
    ANCHOR_ERRORS.into_iter().find(|err| u32::from(*err) == code)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("No wallet available")]
    NoWallet,

    #[error("Request rejected by the user")]
    UserRejected,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Contract reverted: {0}")]
    ContractRevert(String),

    #[error("Metadata unavailable: {0}")]
    MetadataFetch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Current price not loaded yet")]
    PriceUnavailable,
}

impl ClientError {
    /// Classify a transaction failure reported by the cluster
    pub fn from_transaction_error(err: TransactionError) -> Self {
        match err {
            TransactionError::InsufficientFundsForFee
            | TransactionError::InsufficientFundsForRent { .. }
            | TransactionError::InstructionError(_, InstructionError::InsufficientFunds) => {
                ClientError::InsufficientFunds
            }
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                if let Some(reason) = DutchAuctionError::from_code(code) {
                    return ClientError::ContractRevert(reason.to_string());
                }
                if let Some(reason) = anchor_error(code) {
                    return ClientError::ContractRevert(reason.to_string());
                }
                if code == SYSTEM_INSUFFICIENT_LAMPORTS {
                    return ClientError::InsufficientFunds;
                }
                ClientError::ContractRevert(format!("custom program error: {code:#x}"))
            }
            other => ClientError::ContractRevert(other.to_string()),
        }
    }
}

impl From<SolanaClientError> for ClientError {
    fn from(err: SolanaClientError) -> Self {
        match err.get_transaction_error() {
            Some(tx_err) => ClientError::from_transaction_error(tx_err),
            None => ClientError::Network(err.to_string()),
        }
    }
}

impl From<AnchorClientError> for ClientError {
    fn from(err: AnchorClientError) -> Self {
        match err {
            AnchorClientError::SolanaClientError(err) => err.into(),
            AnchorClientError::AccountNotFound => {
                ClientError::Network("account not found".to_string())
            }
            other => ClientError::Network(other.to_string()),
        }
    }
}
