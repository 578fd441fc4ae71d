//! post_record: the only write path.
//!
//! Validates topic/content, then creates the record account via the System
//! Program with exactly `serialized_size` bytes (rent-exempt, owned by this
//! program), stamps the cluster clock and writes the encoded record.
//! A `record` key that already holds lamports fails in the System Program
//! ("account already in use").

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, CreateAccount};

use crate::{
    codec::{encode, serialized_size},
    state::Record,
    validate::validate,
};

/// Accounts for posting a record.
#[derive(Accounts)]
pub struct PostRecord<'info> {
    /// Fresh keypair for the new record account.
    #[account(mut)]
    pub record: Signer<'info>,

    /// Author and rent payer.
    #[account(mut)]
    pub author: Signer<'info>,
    pub system_program: Program<'info, System>,
}

/// Validates `topic`/`content` and returns the account size and the
/// rent-exempt balance for it. Nothing is sized for invalid input.
pub fn plan_allocation(topic: &str, content: &str, rent: &Rent) -> Result<(usize, u64)> {
    validate(topic, content)?;
    let space = serialized_size(topic, content);
    Ok((space, rent.minimum_balance(space)))
}

/// Creates and populates the record account.
/// Validation runs before the `create_account` CPI, so a rejected post
/// never allocates or charges rent.
pub fn handle_post_record(ctx: Context<PostRecord>, topic: String, content: String) -> Result<()> {
    let (space, lamports) = plan_allocation(&topic, &content, &Rent::get()?)?;
    msg!(
        "post_record: author={} topic_len={} content_len={} space={} lamports={}",
        ctx.accounts.author.key(), topic.len(), content.len(), space, lamports
    );

    system_program::create_account(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            CreateAccount {
                from: ctx.accounts.author.to_account_info(),
                to  : ctx.accounts.record.to_account_info(),
            },
        ),
        lamports,
        space as u64,
        &crate::ID,
    )?;

    let record = Record {
        author    : ctx.accounts.author.key(),
        created_at: Clock::get()?.unix_timestamp,
        topic,
        content,
    };

    let info = ctx.accounts.record.to_account_info();
    let mut data = info.try_borrow_mut_data()?;
    data.copy_from_slice(&encode(&record));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::InstructionData;

    use crate::error_code;
    use crate::state::ErrorCode;

    #[test]
    fn invalid_posts_are_rejected_before_sizing() {
        let rent = Rent::default();

        let err = plan_allocation(&"x".repeat(51), "gm", &rent).unwrap_err();
        assert_eq!(error_code(err), u32::from(ErrorCode::TopicTooLong));
        let err = plan_allocation("nft", "", &rent).unwrap_err();
        assert_eq!(error_code(err), u32::from(ErrorCode::ContentEmpty));
        let err = plan_allocation("nft", &"x".repeat(281), &rent).unwrap_err();
        assert_eq!(error_code(err), u32::from(ErrorCode::ContentTooLong));
    }

    #[test]
    fn allocation_is_exact_and_rent_exempt() {
        let rent = Rent::default();
        let (space, lamports) = plan_allocation("nft", "Did you see TW today?", &rent).unwrap();

        assert_eq!(space, 80);
        assert_eq!(lamports, rent.minimum_balance(80));
        assert!(rent.is_exempt(lamports, space));
    }

    #[test]
    fn record_and_author_sign_and_are_writable() {
        let (record, author) = (Pubkey::new_unique(), Pubkey::new_unique());
        let metas = crate::accounts::PostRecord {
            record,
            author,
            system_program: system_program::ID,
        }
        .to_account_metas(None);

        assert_eq!(metas.len(), 3);
        assert_eq!((metas[0].pubkey, metas[0].is_signer, metas[0].is_writable), (record, true, true));
        assert_eq!((metas[1].pubkey, metas[1].is_signer, metas[1].is_writable), (author, true, true));
        assert_eq!(
            (metas[2].pubkey, metas[2].is_signer, metas[2].is_writable),
            (system_program::ID, false, false)
        );
    }

    #[test]
    fn instruction_data_carries_topic_then_content() {
        let ix = crate::instruction::PostRecord {
            topic  : "nft".to_string(),
            content: "gm".to_string(),
        };
        let data = ix.data();

        assert_eq!(&data[..8], crate::instruction::PostRecord::DISCRIMINATOR);
        assert_eq!(&data[8..], &[3, 0, 0, 0, b'n', b'f', b't', 2, 0, 0, 0, b'g', b'm']);
    }
}
