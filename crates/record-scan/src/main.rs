//! Reader CLI for record-store accounts.
//! Prints one JSON object to stdout per command.
//! `filters` emits a getProgramAccounts JSON-RPC request with base64 memcmp filters,
//! `decode` parses raw account data, `check` validates a topic/content pair and sizes it.

use std::str::FromStr;

use anchor_lang::error::Error;
use anchor_lang::prelude::Pubkey;
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use serde::Serialize;

use record_store::{
    codec::{decode, serialized_size},
    filter::predicates,
    validate::validate,
    Memcmp, RecordFilter,
};

/// Defines the CLI and the selected subcommand.
#[derive(Parser, Debug)]
#[command(name = "record-scan")]
#[command(about = "Filter builder and decoder for record-store accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Lists available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints a getProgramAccounts request selecting records (AND of the given filters).
    Filters {
        #[arg(long, default_value_t = record_store::ID.to_string())]
        program: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Decodes base64 account data into a record.
    Decode {
        #[arg(long)]
        data: String,
    },
    /// Validates a topic/content pair and prints the account size it needs.
    Check {
        #[arg(long, default_value = "")]
        topic: String,
        #[arg(long)]
        content: String,
    },
}

/// JSON-RPC request body for getProgramAccounts.
#[derive(Serialize)]
struct OutRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (String, RpcConfig),
}

#[derive(Serialize)]
struct RpcConfig {
    encoding: &'static str,
    filters: Vec<RpcFilter>,
}

#[derive(Serialize)]
struct RpcFilter {
    memcmp: RpcMemcmp,
}

#[derive(Serialize)]
struct RpcMemcmp {
    offset: usize,
    bytes: String,
    encoding: &'static str,
}

/// Holds JSON output of decode.
#[derive(Serialize, Debug)]
struct OutRecord {
    author: String,
    #[serde(rename = "createdAt")]
    created_at: i64,
    topic: String,
    content: String,
    size: usize,
}

/// Holds JSON output of check.
#[derive(Serialize, Debug)]
struct OutCheck {
    space: usize,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).map_err(|e| anyhow!("invalid pubkey {s}: {e}"))
}

/// Prefers the program's own message over Anchor's full error report.
fn describe(err: Error) -> String {
    match err {
        Error::AnchorError(e) => e.error_msg.clone(),
        other => other.to_string(),
    }
}

fn rpc_filter(m: Memcmp) -> RpcFilter {
    RpcFilter {
        memcmp: RpcMemcmp { offset: m.offset, bytes: STANDARD.encode(m.bytes), encoding: "base64" },
    }
}

fn filters_request(program: &Pubkey, filters: &[RecordFilter]) -> OutRequest {
    OutRequest {
        jsonrpc: "2.0",
        id: 1,
        method: "getProgramAccounts",
        params: (
            program.to_string(),
            RpcConfig {
                encoding: "base64",
                filters: predicates(filters).into_iter().map(rpc_filter).collect(),
            },
        ),
    }
}

fn decode_record(data_b64: &str) -> Result<OutRecord> {
    let bytes = STANDARD.decode(data_b64)?;
    let record = decode(&bytes).map_err(|e| anyhow!(describe(e)))?;
    Ok(OutRecord {
        author: record.author.to_string(),
        created_at: record.created_at,
        size: serialized_size(&record.topic, &record.content),
        topic: record.topic,
        content: record.content,
    })
}

fn check(topic: &str, content: &str) -> OutCheck {
    let error = validate(topic, content).err().map(describe);
    OutCheck { space: serialized_size(topic, content), valid: error.is_none(), error }
}

fn main() -> Result<()> {
    // Parses flags and dispatches.
    let cli = Cli::parse();

    match cli.command {
        Commands::Filters { program, author, topic } => {
            let program = parse_pubkey(&program)?;
            let mut filters = Vec::new();
            if let Some(author) = author {
                filters.push(RecordFilter::by_author(parse_pubkey(&author)?));
            }
            if let Some(topic) = topic {
                filters.push(RecordFilter::by_topic(topic));
            }
            println!("{}", serde_json::to_string(&filters_request(&program, &filters))?);
        }
        Commands::Decode { data } => {
            println!("{}", serde_json::to_string(&decode_record(&data)?)?);
        }
        Commands::Check { topic, content } => {
            println!("{}", serde_json::to_string(&check(&topic, &content))?);
        }
    }

    Ok(())
}
