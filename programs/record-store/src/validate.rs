//! Field-length guards, run before any account is allocated.
//! Lengths are UTF-8 byte counts, matching the u32 length prefixes.

use anchor_lang::prelude::*;

use crate::state::{ErrorCode, MAX_CONTENT_BYTES, MAX_TOPIC_BYTES, MIN_CONTENT_BYTES};

pub fn validate(topic: &str, content: &str) -> Result<()> {
    require!(topic.len() <= MAX_TOPIC_BYTES, ErrorCode::TopicTooLong);
    require!(content.len() >= MIN_CONTENT_BYTES, ErrorCode::ContentEmpty);
    require!(content.len() <= MAX_CONTENT_BYTES, ErrorCode::ContentTooLong);
    Ok(())
}
