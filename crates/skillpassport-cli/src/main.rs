// Skill Passport CLI - Command-line client for the Skill Passport API

mod client;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use skillpassport_chain::CredentialKind;

use crate::client::{issue_form, PassportClient};

/// Skill Passport - issue and inspect learner credentials
#[derive(Parser)]
#[command(name = "skillpassport")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "SKILLPASSPORT_URL", default_value = "http://localhost:3000")]
    url: String,

    /// User id to act as
    #[arg(long, global = true, env = "SKILLPASSPORT_USER", default_value_t = 0)]
    as_user: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the acting user's sesskey
    Sesskey,
    /// Issue a credential to a learner
    Issue {
        /// Learner receiving the credential
        #[arg(long)]
        user: i64,

        /// Credential kind: course, activity or badge
        #[arg(long)]
        kind: CredentialKind,

        /// Course, activity or badge id, depending on the kind
        #[arg(long)]
        item: i64,

        /// Existing transaction hash (generated when omitted)
        #[arg(long)]
        hash: Option<String>,
    },
    /// Mint an NFT for a credential
    Mint {
        credential_id: i64,
    },
    /// Show a passport (the acting user's by default)
    Passport {
        #[arg(long)]
        user: Option<i64>,
    },
    /// Show an NFT's metadata
    Nft {
        nft_id: i64,
    },
    /// Export all passport data of a user
    Export {
        user_id: i64,
    },
    /// Erase all passport data of a user
    Erase {
        user_id: i64,
    },
}

fn main() {
    let cli = Cli::parse();
    let client = PassportClient::new(&cli.url, cli.as_user);

    let result = match cli.command {
        Commands::Sesskey => handle_sesskey(&client),
        Commands::Issue {
            user,
            kind,
            item,
            hash,
        } => handle_issue(&client, user, kind, item, hash.as_deref()),
        Commands::Mint { credential_id } => handle_mint(&client, credential_id),
        Commands::Passport { user } => handle_passport(&client, user),
        Commands::Nft { nft_id } => handle_nft(&client, nft_id),
        Commands::Export { user_id } => handle_export(&client, user_id),
        Commands::Erase { user_id } => handle_erase(&client, user_id),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn handle_sesskey(client: &PassportClient) -> Result<()> {
    println!("{}", client.sesskey()?);
    Ok(())
}

fn handle_issue(
    client: &PassportClient,
    user: i64,
    kind: CredentialKind,
    item: i64,
    hash: Option<&str>,
) -> Result<()> {
    let credential = client.issue(&issue_form(user, kind, item, hash))?;
    println!(
        "{} {} #{} issued to user {}",
        "✓".green().bold(),
        kind.label(),
        credential["id"],
        user
    );
    println!("  tx hash: {}", credential["blockchain_txhash"].as_str().unwrap_or(""));
    Ok(())
}

fn handle_mint(client: &PassportClient, credential_id: i64) -> Result<()> {
    let nft = client.mint(credential_id)?;
    println!(
        "{} NFT #{} minted for credential #{}",
        "✓".green().bold(),
        nft["id"],
        credential_id
    );
    println!("  token:    {}", nft["token_id"].as_str().unwrap_or(""));
    println!("  contract: {}", nft["contract_address"].as_str().unwrap_or(""));
    Ok(())
}

fn handle_passport(client: &PassportClient, user: Option<i64>) -> Result<()> {
    let passport = client.passport(user)?;
    let mut lines = render::passport_lines(&passport).into_iter();
    if let Some(title) = lines.next() {
        println!("{}", title.bold());
    }
    lines.for_each(|line| println!("{}", line));
    Ok(())
}

fn handle_nft(client: &PassportClient, nft_id: i64) -> Result<()> {
    let nft = client.nft(nft_id)?;
    for line in render::nft_lines(&nft) {
        println!("{}", line);
    }
    Ok(())
}

fn handle_export(client: &PassportClient, user_id: i64) -> Result<()> {
    print_json(&client.export(user_id)?)
}

fn handle_erase(client: &PassportClient, user_id: i64) -> Result<()> {
    let result = client.erase(user_id)?;
    let deleted = &result["deleted"];
    println!(
        "{} Erased {} credential(s) and {} NFT record(s) of user {}",
        "✓".green().bold(),
        deleted["credentials"],
        deleted["nfts"],
        user_id
    );
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue() {
        let cli = Cli::try_parse_from([
            "skillpassport",
            "--url",
            "http://example.test",
            "--as-user",
            "2",
            "issue",
            "--user",
            "3",
            "--kind",
            "badge",
            "--item",
            "42",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://example.test");
        assert_eq!(cli.as_user, 2);
        match cli.command {
            Commands::Issue { user, kind, item, hash } => {
                assert_eq!(user, 3);
                assert_eq!(kind, CredentialKind::Badge);
                assert_eq!(item, 42);
                assert!(hash.is_none());
            }
            _ => panic!("expected issue"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = Cli::try_parse_from([
            "skillpassport", "issue", "--user", "3", "--kind", "diploma", "--item", "1",
        ]);
        assert!(result.is_err());
    }
}
