//! On-chain state layout.
//!
//! Record: one account per posted record, sized exactly to its contents.
//! Fixed-size fields (author, created_at) precede the variable strings so
//! filters can address them at static offsets.

use anchor_lang::prelude::*;

// Size constants
pub const DISC_SIZE: usize = 8;
pub const PUBKEY_SIZE: usize = 32;
pub const TIMESTAMP_SIZE: usize = 8;
pub const STR_PREFIX_SIZE: usize = 4; // u32 LE length prefix

// Field offsets
pub const AUTHOR_OFFSET: usize = DISC_SIZE; // = 8
pub const CREATED_AT_OFFSET: usize = AUTHOR_OFFSET + PUBKEY_SIZE; // = 40
pub const TOPIC_LEN_OFFSET: usize = CREATED_AT_OFFSET + TIMESTAMP_SIZE; // = 48
pub const TOPIC_OFFSET: usize = TOPIC_LEN_OFFSET + STR_PREFIX_SIZE; // = 52

/// Bytes every record occupies regardless of topic/content.
pub const RECORD_HEAD: usize = TOPIC_OFFSET + STR_PREFIX_SIZE; // = 56

// Field limits, in UTF-8 bytes
pub const MAX_TOPIC_BYTES: usize = 50;
pub const MIN_CONTENT_BYTES: usize = 1;
pub const MAX_CONTENT_BYTES: usize = 280;

/// A posted record. Written once by `post_record`, never mutated.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Record {
    pub author    : Pubkey,
    pub created_at: i64,
    pub topic     : String,
    pub content   : String,
}

#[error_code]
pub enum ErrorCode {
    #[msg("The provided topic should be 50 bytes long maximum.")]
    TopicTooLong,
    #[msg("The provided content should be 280 bytes long maximum.")]
    ContentTooLong,
    #[msg("The provided content should not be empty.")]
    ContentEmpty,
    #[msg("The declared author did not sign the request.")]
    Unauthorized,
    #[msg("The record account is already in use.")]
    AccountInUse,
    #[msg("Insufficient funds to allocate the record account.")]
    InsufficientFunds,
    #[msg("The record account does not exist.")]
    AccountNotFound,
    #[msg("The account data is not a valid record.")]
    CorruptRecord,
    #[msg("The data does not match the allocated account size.")]
    AccountSizeMismatch,
    #[msg("The ledger state is unavailable.")]
    LedgerUnavailable,
}
