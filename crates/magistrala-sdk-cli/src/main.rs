//! # Magistrala CLI
//!
//! Command-line utilities for addressing, query encoding and telemetry.
//!
//! Service URLs are read from `MG_*_URL` environment variables, see
//! [`SdkConfig::from_env`].

use anyhow::{bail, Context, Result};
use magistrala_sdk_client::{Sdk, SdkConfig};
use magistrala_sdk_core::defs::{MessagesPageMetadata, PageMetadata};
use magistrala_sdk_core::{QueryParameters, QueryValue, ResourceAddress};
use serde::de::IgnoredAny;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "address" => {
            if args.len() < 3 {
                eprintln!("Usage: magistrala address <channel[.subtopic]>");
                std::process::exit(1);
            }
            let address = ResourceAddress::decode(&args[2]);
            let out = serde_json::json!({
                "id": address.id,
                "subtopic": address.subtopic,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        "query" => {
            let params = parse_query(&args[2..])?;
            println!("{}", params.encode());
        }
        "send" => {
            if args.len() < 5 {
                eprintln!("Usage: magistrala send <channel[.subtopic]> <thing-secret> <json>");
                std::process::exit(1);
            }
            let payload = checked_payload(&args[4])?;

            let sdk = sdk()?;
            let resp = sdk
                .messages
                .send(&args[2], payload, &args[3])
                .await
                .context("Failed to send message")?;

            tracing::info!(channel = %args[2], status = resp.status, "Message sent");
        }
        "read" => {
            if args.len() < 5 {
                eprintln!("Usage: magistrala read <domain> <channel[.subtopic]> <token> [limit]");
                std::process::exit(1);
            }
            let limit = args
                .get(5)
                .map(|l| l.parse::<u64>())
                .transpose()
                .context("Limit must be a non-negative integer")?;
            let pm = MessagesPageMetadata {
                page: PageMetadata {
                    limit,
                    ..Default::default()
                },
                ..Default::default()
            };

            let sdk = sdk()?;
            let page = sdk
                .messages
                .read(&args[2], &args[3], &pm, &args[4])
                .await
                .context("Failed to read messages")?;

            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn sdk() -> Result<Sdk> {
    let config = SdkConfig::from_env().context("Invalid service configuration")?;
    Sdk::new(config).context("Failed to initialize SDK")
}

/// Payload bytes exactly as given, after checking they are valid JSON.
fn checked_payload(raw: &str) -> Result<Vec<u8>> {
    serde_json::from_str::<IgnoredAny>(raw).context("Payload is not valid JSON")?;
    Ok(raw.as_bytes().to_vec())
}

/// Parse `key=value` pairs. Integers and booleans keep their type.
fn parse_query(pairs: &[String]) -> Result<QueryParameters> {
    let mut params = QueryParameters::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Expected key=value, got {pair:?}");
        };
        let value = if let Ok(n) = raw.parse::<i64>() {
            QueryValue::Int(n)
        } else if let Ok(b) = raw.parse::<bool>() {
            QueryValue::Bool(b)
        } else {
            QueryValue::Str(raw.to_string())
        };
        params = params.with(key, value);
    }
    Ok(params)
}

fn print_help() {
    println!(
        r#"Magistrala CLI

USAGE:
    magistrala <COMMAND> [OPTIONS]

COMMANDS:
    address <channel[.subtopic]>                  Decode a composite channel address
    query <key=value>...                          Encode query parameters
    send <channel[.subtopic]> <secret> <json>     Publish a message as a thing
    read <domain> <channel[.subtopic]> <token> [limit]
                                                  Read stored messages
    help                                          Show this help message

ENVIRONMENT:
    MG_HOST_URL, MG_<SERVICE>_URL                 Service base URLs
    MG_CA_CERT, MG_CLIENT_CERT, MG_CLIENT_KEY     TLS material
    RUST_LOG                                      Log filter (default: info)

EXAMPLES:
    magistrala address "chan1.temp.value"
    magistrala query limit=10 name=sensor
    magistrala send chan1.temp s3cret '[{{"n":"t","v":21.5}}]'
"#
    );
}
