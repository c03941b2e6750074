// crates/skillgraph-cli/src/commands/reputation.rs
//
// `skillgraph reputation`: global reputation from a trusted seed set.

use clap::Args;
use tabled::Tabled;

use skillgraph_core::UserId;
use skillgraph_engine::TrustEngine;

use crate::output::{format_json, format_score, format_table, OutputFormat};

#[derive(Debug, Args)]
pub struct ReputationCmd {
    /// Trusted seed user id. Repeat for several seeds.
    #[arg(long = "seed", required = true)]
    seeds: Vec<String>,
    /// Also write the scores to the users' cached reputation.
    #[arg(long)]
    refresh: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Reputation")]
    score: String,
}

/// Run the reputation command.
pub async fn run(
    engine: &TrustEngine,
    cmd: &ReputationCmd,
) -> Result<(), Box<dyn std::error::Error>> {
    let seeds: Vec<UserId> = cmd.seeds.iter().map(|s| UserId::from(s.as_str())).collect();
    let scores = if cmd.refresh {
        engine.refresh_reputation_cache(&seeds).await?
    } else {
        engine.compute_global_reputation(&seeds).await?
    };

    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Json => println!("{}", format_json(&scores.entries)),
        OutputFormat::Table => {
            if scores.is_empty() {
                println!("No valid seeds; nothing reached.");
                return Ok(());
            }
            let rows: Vec<ScoreRow> = scores
                .iter()
                .enumerate()
                .map(|(i, e)| ScoreRow {
                    rank: i + 1,
                    user: e.user_id.to_string(),
                    score: format_score(e.score),
                })
                .collect();
            println!("{}", format_table(&rows));
            println!(
                "{} user(s) reached, {} edge visits, depth {}",
                scores.len(),
                scores.edges_visited,
                scores.depth_reached
            );
        }
    }

    Ok(())
}
