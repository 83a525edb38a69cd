use anyhow::Result;
use clap::Args;
use colored::Colorize;
use docgraph_common::{find_by_id, id_map};
use std::path::PathBuf;

use super::{describe, load_document};

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Document to search (JSON tree)
    pub input: PathBuf,

    /// Element id to look up
    pub id: String,
}

pub fn find(args: FindArgs) -> Result<()> {
    let doc = load_document(&args.input)?;

    let first = find_by_id(&doc, &args.id);
    let mapped = id_map(&doc).get(&args.id).copied();

    match first {
        Some(node) => println!("{} {} {}", "✓".green(), node, describe(&doc, node)),
        None => {
            println!("{} no element with id {}", "✗".red(), args.id.bold());
            return Ok(());
        }
    }

    if mapped != first {
        if let Some(node) = mapped {
            println!(
                "{} id {} is used more than once: search returns {}, id map returns {} {}",
                "!".yellow().bold(),
                args.id.bold(),
                first.map(|n| n.to_string()).unwrap_or_default(),
                node,
                describe(&doc, node)
            );
        }
    }
    Ok(())
}
