//! Status command - summarize the stored agent

use anyhow::Result;
use clap::Parser;

use crate::cli::{
    GlobalArgs,
    output::{print_kv, print_section},
};

#[derive(Parser, Debug)]
#[command(about = "Show what the agent has learned")]
pub struct StatusArgs {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(global: &GlobalArgs, args: StatusArgs) -> Result<()> {
    let service = global.open_service(global.app_config()?)?;
    let status = service.status();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    print_section("Agent Status");
    print_kv("Table", &global.table.display().to_string());
    print_kv("Player", &service.agent().player().to_string());
    print_kv("Known states", &status.table_size.to_string());
    print_kv(
        "Stored values",
        &service.agent().value_table().action_count().to_string(),
    );
    print_kv("Opening value", &format!("{:.4}", status.opening_value));
    print_kv("Exploration rate", &format!("{:.4}", status.exploration_rate));
    Ok(())
}
