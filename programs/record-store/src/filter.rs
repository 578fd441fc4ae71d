//! Record filters as fixed-offset byte predicates.
//!
//! The ledger has no secondary indexes; a scan keeps an account only when
//! every predicate's bytes appear verbatim at its offset. Offsets come from
//! the layout in `state` and stay valid only while fixed-size fields precede
//! the strings.

use anchor_lang::prelude::*;

use crate::state::{Record, AUTHOR_OFFSET, TOPIC_LEN_OFFSET};

/// Byte-sequence match at an exact offset (RPC `memcmp`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memcmp {
    pub offset: usize,
    pub bytes : Vec<u8>,
}

impl Memcmp {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self { offset, bytes: bytes.into() }
    }

    /// True when `data[offset..offset + len]` equals `bytes`.
    /// Predicates running past the end of `data` never match.
    pub fn matches(&self, data: &[u8]) -> bool {
        self.offset
            .checked_add(self.bytes.len())
            .and_then(|end| data.get(self.offset..end))
            .is_some_and(|window| window == self.bytes.as_slice())
    }
}

/// Selects records in a scan. Several filters combine with AND.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    ByAuthor(Pubkey),
    ByTopic(String),
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::All
    }

    pub fn by_author(author: Pubkey) -> Self {
        Self::ByAuthor(author)
    }

    pub fn by_topic(topic: impl Into<String>) -> Self {
        Self::ByTopic(topic.into())
    }

    /// The predicate this filter adds to a scan, if any.
    ///
    /// Topics match on the u32 length prefix plus the bytes, so `"nf"` does
    /// not select `"nft"` and `""` selects only empty topics.
    pub fn predicate(&self) -> Option<Memcmp> {
        match self {
            Self::All => None,
            Self::ByAuthor(author) => Some(Memcmp::new(AUTHOR_OFFSET, author.to_bytes())),
            Self::ByTopic(topic) => {
                let mut bytes = Vec::with_capacity(4 + topic.len());
                bytes.extend_from_slice(&(topic.len() as u32).to_le_bytes());
                bytes.extend_from_slice(topic.as_bytes());
                Some(Memcmp::new(TOPIC_LEN_OFFSET, bytes))
            }
        }
    }
}

/// Matches the Record discriminator, excluding other account kinds the
/// program may own.
pub fn discriminator() -> Memcmp {
    Memcmp::new(0, Record::DISCRIMINATOR)
}

/// Full predicate list for a scan: discriminator first, then each filter.
pub fn predicates(filters: &[RecordFilter]) -> Vec<Memcmp> {
    std::iter::once(discriminator())
        .chain(filters.iter().filter_map(RecordFilter::predicate))
        .collect()
}
