// crates/skillgraph-cli/src/commands/user.rs
//
// `skillgraph user {add, show}`: user registration and lookup.

use clap::Subcommand;
use tabled::Tabled;

use skillgraph_core::{User, UserId};
use skillgraph_engine::TrustEngine;

use crate::output::{format_json, format_score, format_table, OutputFormat};

/// User subcommands.
#[derive(Debug, Subcommand)]
pub enum UserCmd {
    /// Register a user with the configured starting balance.
    Add {
        /// Unique user id.
        id: String,
        /// Display name (defaults to the id).
        #[arg(long)]
        name: Option<String>,
    },
    /// Show a user's balance and cached reputation.
    Show {
        id: String,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Stake Balance")]
    balance: u64,
    #[tabled(rename = "Cached Reputation")]
    reputation: String,
    #[tabled(rename = "Seed")]
    seed: bool,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.display_name.clone(),
            balance: user.reputation_stake_balance,
            reputation: format_score(user.global_reputation_score),
            seed: user.is_seed,
        }
    }
}

/// Run the user subcommand.
pub async fn run(engine: &TrustEngine, cmd: &UserCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        UserCmd::Add { id, name } => {
            let id = UserId::from(id.as_str());
            let display_name = name.clone().unwrap_or_else(|| id.to_string());
            let user = engine.register_user(&id, &display_name).await?;
            println!("User {} ({})", user.id, user.display_name);
            println!("  Stake balance: {}", user.reputation_stake_balance);
        }
        UserCmd::Show { id, json } => {
            let user = engine.get_user(&UserId::from(id.as_str())).await?;
            match OutputFormat::from_json_flag(*json) {
                OutputFormat::Json => println!("{}", format_json(&user)),
                OutputFormat::Table => println!("{}", format_table(&[UserRow::from(&user)])),
            }
        }
    }

    Ok(())
}
