use anyhow::Result;
use clap::Args;
use colored::Colorize;
use docgraph_common::all_ids;
use docgraph_model::{Document, NodeId};
use std::path::PathBuf;

use super::load_document;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Document to inspect (JSON tree)
    pub input: PathBuf,

    /// Hide text properties
    #[arg(long)]
    pub objects_only: bool,
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let doc = load_document(&args.input)?;

    println!("🔍 {} {}", "Inspecting".green().bold(), args.input.display());
    println!();
    match doc.root() {
        Some(root) => print_object(&doc, root, 1, args.objects_only),
        None => println!("   {}", "(empty document)".dimmed()),
    }
    println!();
    println!("   Nodes:    {}", doc.node_count());
    println!("   Ids:      {}", all_ids(&doc).len());
    println!("   Revision: {}", doc.revision());
    Ok(())
}

fn print_object(doc: &Document, object: NodeId, depth: usize, objects_only: bool) {
    println!("{}{}", "   ".repeat(depth), doc.node(object).label().cyan());
    for &property in doc.properties(object) {
        let node = doc.node(property);
        if node.as_collection().is_some() {
            println!("{}{}", "   ".repeat(depth + 1), node.label().yellow());
            for &value in doc.values(property) {
                print_object(doc, value, depth + 2, objects_only);
            }
        } else if !objects_only {
            println!("{}{}", "   ".repeat(depth + 1), node.label());
        }
    }
}
