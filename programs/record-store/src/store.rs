//! Record writes and reads over a `Ledger`.
//!
//! create: signer check → length validation → stamp the ledger clock →
//! `Ledger::create_account` with the encoded record. Every check runs before
//! the ledger is touched, and the account appears fully written or not at
//! all, so a rejected create leaves nothing allocated and readers never see
//! a partial record.

use anchor_lang::prelude::*;

use crate::{
    codec::{decode, encode, serialized_size},
    filter::{predicates, RecordFilter},
    ledger::Ledger,
    state::{ErrorCode, Record},
    validate::validate,
};

pub struct RecordStore<L> {
    ledger    : L,
    program_id: Pubkey,
}

impl<L: Ledger> RecordStore<L> {
    /// Store for records owned by this program's id.
    pub fn new(ledger: L) -> Self {
        Self::with_program_id(ledger, crate::ID)
    }

    pub fn with_program_id(ledger: L, program_id: Pubkey) -> Self {
        Self { ledger, program_id }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Posts a record into the fresh account `record`.
    /// Both `author` and `record` must be among the verified `signers`.
    pub fn create(
        &self,
        author : &Pubkey,
        topic  : &str,
        content: &str,
        record : &Pubkey,
        signers: &[Pubkey],
    ) -> Result<Record> {
        require!(signers.contains(author), ErrorCode::Unauthorized);
        require!(signers.contains(record), ErrorCode::Unauthorized);
        validate(topic, content)?;

        let space = serialized_size(topic, content);
        msg!(
            "create: record={} author={} topic_len={} content_len={} space={}",
            record, author, topic.len(), content.len(), space
        );

        let stored = Record {
            author    : *author,
            created_at: self.ledger.current_timestamp(),
            topic     : topic.to_owned(),
            content   : content.to_owned(),
        };
        let data = encode(&stored);
        debug_assert_eq!(data.len(), space);
        self.ledger.create_account(&self.program_id, record, &data)?;
        Ok(stored)
    }

    /// Reads one record by account key.
    pub fn fetch(&self, record: &Pubkey) -> Result<Record> {
        decode(&self.ledger.read_account_data(record)?)
    }

    /// Returns every record matching all `filters`, keyed by account.
    pub fn scan(&self, filters: &[RecordFilter]) -> Result<Vec<(Pubkey, Record)>> {
        let preds = predicates(filters);
        let hits = self.ledger.scan_accounts_by_owner(&self.program_id, &preds)?;
        msg!("scan: filters={} hits={}", filters.len(), hits.len());
        hits.into_iter()
            .map(|(key, data)| decode(&data).map(|record| (key, record)))
            .collect()
    }

    pub fn all(&self) -> Result<Vec<(Pubkey, Record)>> {
        self.scan(&[])
    }

    pub fn by_author(&self, author: Pubkey) -> Result<Vec<(Pubkey, Record)>> {
        self.scan(&[RecordFilter::by_author(author)])
    }

    pub fn by_topic(&self, topic: &str) -> Result<Vec<(Pubkey, Record)>> {
        self.scan(&[RecordFilter::by_topic(topic)])
    }
}
