// crates/skillgraph-cli/src/commands/graph.rs
//
// `skillgraph graph`: dump every user and verification edge.

use clap::Args;
use tabled::Tabled;

use skillgraph_engine::TrustEngine;

use crate::output::{format_json, format_table, OutputFormat};

#[derive(Debug, Args)]
pub struct GraphCmd {
    /// Print `{nodes, edges}` JSON for visualization tools.
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    label: String,
    #[tabled(rename = "Type")]
    kind: String,
}

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "Verifier")]
    source: String,
    #[tabled(rename = "Candidate")]
    target: String,
    #[tabled(rename = "Skill")]
    skill: String,
}

/// Run the graph command.
pub async fn run(engine: &TrustEngine, cmd: &GraphCmd) -> Result<(), Box<dyn std::error::Error>> {
    let view = engine.get_trust_graph().await?;

    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Json => println!("{}", format_json(&view)),
        OutputFormat::Table => {
            let nodes: Vec<NodeRow> = view
                .nodes
                .iter()
                .map(|n| NodeRow {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    kind: format!("{:?}", n.kind).to_lowercase(),
                })
                .collect();
            let edges: Vec<EdgeRow> = view
                .edges
                .iter()
                .map(|e| EdgeRow {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    skill: e.label.clone(),
                })
                .collect();
            println!("Users ({})", nodes.len());
            println!("{}", format_table(&nodes));
            println!();
            println!("Verifications ({})", edges.len());
            println!("{}", format_table(&edges));
        }
    }

    Ok(())
}
