// crates/skillgraph-cli/src/commands/stake.rs
//
// `skillgraph stake`: spend stake balance to verify a candidate's skill.

use clap::Args;

use skillgraph_core::UserId;
use skillgraph_engine::TrustEngine;

use crate::output::{format_json, OutputFormat};

/// Arguments for a staked verification.
#[derive(Debug, Args)]
pub struct StakeCmd {
    /// Id of the user vouching (pays the stake).
    #[arg(long)]
    verifier: String,
    /// Id of the user being vouched for.
    #[arg(long)]
    candidate: String,
    /// Skill tag being verified.
    #[arg(long)]
    skill: String,
    /// Stake amount, debited from the verifier and never refunded.
    #[arg(long)]
    amount: u64,
    /// Print the receipt as JSON.
    #[arg(long)]
    json: bool,
}

/// Run the stake command.
pub async fn run(engine: &TrustEngine, cmd: &StakeCmd) -> Result<(), Box<dyn std::error::Error>> {
    let verifier = UserId::from(cmd.verifier.as_str());
    let candidate = UserId::from(cmd.candidate.as_str());
    let receipt = engine
        .stake_verification(&verifier, &candidate, &cmd.skill, cmd.amount)
        .await?;

    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Json => println!("{}", format_json(&receipt)),
        OutputFormat::Table => {
            println!(
                "{} staked {} to verify {} for '{}'",
                verifier,
                cmd.amount,
                candidate,
                cmd.skill.trim()
            );
            println!("  Edge:              {}", receipt.edge_id);
            println!("  Remaining balance: {}", receipt.new_balance);
        }
    }

    Ok(())
}
