//! # Module overview
//! Append-only record store. Each `post_record` call allocates one
//! program-owned account holding (author, created_at, topic, content);
//! readers enumerate records straight from account storage with
//! fixed-offset memcmp filters.
//!
//! # Instruction set
//! post_record: validate topic/content, create the exact-size record account, write it.
//!
//! # Host-side modules
//! codec / filter: byte layout and scan predicates, shared with off-chain readers.
//! ledger / store: `Ledger` boundary, `InMemoryLedger`, and `RecordStore`
//! (create / fetch / scan) for embedding and tests.

#![allow(unexpected_cfgs)] // Keep until Anchor's cfg layout is simplified

use anchor_lang::prelude::*;

pub mod state;
pub mod codec;
pub mod validate;
pub mod filter;
mod post;

#[cfg(not(target_os = "solana"))]
pub mod ledger;
#[cfg(not(target_os = "solana"))]
pub mod store;

// Program ID
declare_id!("7eGxg85MQAKHuspzXhQA6jq8beNrY3Cnko57mczjqgEm");

// Re-exports (glob keeps Anchor's generated client account modules at the crate root)
pub use post::*;
pub use state::{ErrorCode, Record};
pub use filter::{Memcmp, RecordFilter};

#[cfg(not(target_os = "solana"))]
pub use ledger::{InMemoryLedger, Ledger};
#[cfg(not(target_os = "solana"))]
pub use store::RecordStore;

#[program]
pub mod record_store {
    use super::*;

    /// Posts a record into the fresh `record` account, signed by `author`.
    pub fn post_record(ctx: Context<PostRecord>, topic: String, content: String) -> Result<()> {
        post::handle_post_record(ctx, topic, content)
    }
}

/// Custom error number carried by an Anchor error.
#[cfg(test)]
pub(crate) fn error_code(err: anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        anchor_lang::error::Error::ProgramError(e) => panic!("unexpected program error: {e:?}"),
    }
}
