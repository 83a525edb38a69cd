use anyhow::Result;
use clap::Args;
use colored::Colorize;
use docgraph_common::{expression_references, references};
use std::path::PathBuf;

use super::{describe, load_document};

#[derive(Args, Debug)]
pub struct RefsArgs {
    /// Document to search (JSON tree)
    pub input: PathBuf,

    /// Only list references to this id
    #[arg(short, long)]
    pub source: Option<String>,
}

pub fn refs(args: RefsArgs) -> Result<()> {
    let doc = load_document(&args.input)?;
    let source = args.source.as_deref();

    let intrinsics = references(&doc, source);
    let expressions = expression_references(&doc, source);

    println!("{} ({})", "Intrinsic references".bold(), intrinsics.len());
    for node in &intrinsics {
        println!("   {} {}", node, describe(&doc, *node));
    }
    println!("{} ({})", "Expression references".bold(), expressions.len());
    for node in &expressions {
        println!("   {} {}", node, describe(&doc, *node));
    }

    if intrinsics.is_empty() && expressions.is_empty() {
        println!("   {}", "none".dimmed());
    }
    Ok(())
}
