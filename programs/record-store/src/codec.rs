//! Record byte layout.
//!
//! `[8 disc][32 author][8 created_at][4 topic_len][topic][4 content_len][content]`,
//! little-endian, no padding. This is the Borsh layout Anchor writes for the
//! `Record` account; `encode` and `decode` spell it out so readers can work
//! on raw account data without the program.

use anchor_lang::prelude::*;

use crate::state::{ErrorCode, Record, DISC_SIZE, PUBKEY_SIZE, RECORD_HEAD, STR_PREFIX_SIZE};

/// Exact account size for a record holding `topic` and `content`.
pub fn serialized_size(topic: &str, content: &str) -> usize {
    RECORD_HEAD + topic.len() + content.len()
}

/// Serializes a record, discriminator included.
pub fn encode(record: &Record) -> Vec<u8> {
    let mut out = Vec::with_capacity(serialized_size(&record.topic, &record.content));
    out.extend_from_slice(Record::DISCRIMINATOR);
    out.extend_from_slice(record.author.as_ref());
    out.extend_from_slice(&record.created_at.to_le_bytes());
    put_str(&mut out, &record.topic);
    put_str(&mut out, &record.content);
    out
}

/// Parses raw account data. Bytes after `content` are ignored.
pub fn decode(data: &[u8]) -> Result<Record> {
    require!(data.len() >= RECORD_HEAD, ErrorCode::CorruptRecord);

    let mut buf = data;
    let disc = take(&mut buf, DISC_SIZE)?;
    require!(disc == Record::DISCRIMINATOR, ErrorCode::CorruptRecord);

    let mut author = [0u8; PUBKEY_SIZE];
    author.copy_from_slice(take(&mut buf, PUBKEY_SIZE)?);

    let mut ts = [0u8; 8];
    ts.copy_from_slice(take(&mut buf, 8)?);

    let topic = take_str(&mut buf)?;
    let content = take_str(&mut buf)?;

    Ok(Record {
        author: Pubkey::new_from_array(author),
        created_at: i64::from_le_bytes(ts),
        topic,
        content,
    })
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn take<'a>(buf: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    require!(buf.len() >= n, ErrorCode::CorruptRecord);
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

fn take_str(buf: &mut &[u8]) -> Result<String> {
    let mut le = [0u8; STR_PREFIX_SIZE];
    le.copy_from_slice(take(buf, STR_PREFIX_SIZE)?);
    let len = u32::from_le_bytes(le) as usize;
    let bytes = take(buf, len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| error!(ErrorCode::CorruptRecord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code;
    use crate::state::{
        AUTHOR_OFFSET, CREATED_AT_OFFSET, MAX_CONTENT_BYTES, MAX_TOPIC_BYTES, MIN_CONTENT_BYTES,
        TOPIC_LEN_OFFSET, TOPIC_OFFSET,
    };

    fn record(topic: &str, content: &str) -> Record {
        Record {
            author: Pubkey::new_unique(),
            created_at: 1_700_000_000,
            topic: topic.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn decode_inverts_encode() {
        let long_topic = "t".repeat(50);
        let long_content = "c".repeat(280);
        for (topic, content) in [
            ("nft", "Did you see TW today?"),
            ("", "gm"),
            ("ünïcödé", "emoji 🦀 content"),
            (long_topic.as_str(), long_content.as_str()),
        ] {
            let r = record(topic, content);
            assert_eq!(decode(&encode(&r)).unwrap(), r);
        }
    }

    /// Exactly `n` bytes of text mixing 1- to 4-byte characters.
    fn text_of_len(n: usize) -> String {
        let mut out = String::with_capacity(n);
        for c in ['a', 'é', '€', '🦀'].into_iter().cycle() {
            let room = n - out.len();
            if room == 0 {
                break;
            }
            out.push(if c.len_utf8() <= room { c } else { 'a' });
        }
        out
    }

    #[test]
    fn round_trips_every_valid_length() {
        let author = Pubkey::new_unique();
        for topic_len in 0..=MAX_TOPIC_BYTES {
            let topic = text_of_len(topic_len);
            assert_eq!(topic.len(), topic_len);
            for content_len in MIN_CONTENT_BYTES..=MAX_CONTENT_BYTES {
                let r = Record {
                    author,
                    created_at: -(content_len as i64),
                    topic: topic.clone(),
                    content: text_of_len(content_len),
                };
                crate::validate::validate(&r.topic, &r.content).unwrap();

                let bytes = encode(&r);
                assert_eq!(bytes.len(), serialized_size(&r.topic, &r.content));
                assert_eq!(decode(&bytes).unwrap(), r);
            }
        }
    }

    #[test]
    fn encode_matches_anchor_account_serialization() {
        let r = record("solana", "hello world");
        let mut anchor = Vec::new();
        r.try_serialize(&mut anchor).unwrap();
        assert_eq!(encode(&r), anchor);

        let parsed = Record::try_deserialize(&mut &anchor[..]).unwrap();
        assert_eq!(parsed, r);
    }

    #[test]
    fn size_is_exact() {
        let r = record("nft", "Did you see TW today?");
        assert_eq!(serialized_size(&r.topic, &r.content), 80);
        assert_eq!(encode(&r).len(), 80);
        assert_eq!(serialized_size("", "gm"), RECORD_HEAD + 2);
    }

    #[test]
    fn fields_sit_at_fixed_offsets() {
        let mut r = record("nft", "x");
        r.created_at = -5;
        let bytes = encode(&r);

        assert_eq!(&bytes[..DISC_SIZE], Record::DISCRIMINATOR);
        assert_eq!(&bytes[AUTHOR_OFFSET..AUTHOR_OFFSET + 32], r.author.as_ref());
        assert_eq!(&bytes[CREATED_AT_OFFSET..TOPIC_LEN_OFFSET], &(-5i64).to_le_bytes());
        assert_eq!(&bytes[TOPIC_LEN_OFFSET..TOPIC_OFFSET], &3u32.to_le_bytes());
        assert_eq!(&bytes[TOPIC_OFFSET..TOPIC_OFFSET + 3], b"nft");
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let r = record("nft", "padded");
        let mut bytes = encode(&r);
        bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(decode(&bytes).unwrap(), r);
    }

    #[test]
    fn wrong_discriminator_is_corrupt() {
        let mut bytes = encode(&record("nft", "gm"));
        bytes[0] ^= 0xff;
        let err = decode(&bytes).unwrap_err();
        assert_eq!(error_code(err), u32::from(ErrorCode::CorruptRecord));
    }

    #[test]
    fn truncated_buffer_is_corrupt() {
        let bytes = encode(&record("nft", "Did you see TW today?"));
        for cut in [0, DISC_SIZE, RECORD_HEAD - 1, bytes.len() - 1] {
            let err = decode(&bytes[..cut]).unwrap_err();
            assert_eq!(error_code(err), u32::from(ErrorCode::CorruptRecord), "cut at {cut}");
        }
    }

    #[test]
    fn oversized_length_prefix_is_corrupt() {
        let mut bytes = encode(&record("nft", "gm"));
        bytes[TOPIC_LEN_OFFSET..TOPIC_OFFSET].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert_eq!(error_code(err), u32::from(ErrorCode::CorruptRecord));
    }

    #[test]
    fn invalid_utf8_is_corrupt() {
        let mut bytes = encode(&record("abc", "gm"));
        bytes[TOPIC_OFFSET] = 0xff;
        let err = decode(&bytes).unwrap_err();
        assert_eq!(error_code(err), u32::from(ErrorCode::CorruptRecord));
    }
}
