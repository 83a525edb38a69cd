use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use docgraph_editor::{EditSession, ExtensionRegistry};
use std::path::PathBuf;
use std::rc::Rc;

use super::load_document;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Document to expand (JSON tree)
    pub input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn expand(args: ExpandArgs, config: &Config) -> Result<()> {
    let document = load_document(&args.input)?;
    let mut session = EditSession::new(
        document,
        Rc::new(config.metadata()),
        Rc::new(ExtensionRegistry::new()),
    )
    .with_max_undo_levels(config.max_undo_levels);

    let expanded = session.expand_all_references()?;
    let bytes = session.document().to_bytes()?;

    match &args.out {
        Some(out) => {
            std::fs::write(out, &bytes).with_context(|| format!("writing {}", out.display()))?;
            eprintln!(
                "{} {} → {}",
                if expanded { "Expanded".green().bold() } else { "Unchanged".yellow().bold() },
                args.input.display(),
                out.display()
            );
        }
        None => {
            println!("{}", String::from_utf8_lossy(&bytes));
            if !expanded {
                eprintln!("{} no expandable references", "Unchanged".yellow().bold());
            }
        }
    }
    Ok(())
}
