//! Reset command - forget everything the agent has learned

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::GlobalArgs;

#[derive(Parser, Debug)]
#[command(about = "Erase the learned value table")]
pub struct ResetArgs {}

pub fn execute(global: &GlobalArgs, _args: ResetArgs) -> Result<()> {
    let mut service = global.open_service(global.app_config()?)?;
    let previous = service.status().table_size;

    service.reset_learning();
    service
        .flush()
        .with_context(|| format!("saving empty table to {}", global.table.display()))?;

    println!(
        "Cleared {previous} states from {}",
        global.table.display()
    );
    Ok(())
}
