//! Train command - batch training against a scripted opponent

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    cli::{
        GlobalArgs, parse_player_token,
        output::{percent, print_kv, print_section},
    },
    pipeline::{
        Opponent, ProgressObserver, RandomOpponent, TacticalOpponent, TrainingConfig,
        TrainingPipeline, TrainingResult,
    },
};

/// Scripted opponents available for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    /// Uniformly random moves
    Random,
    /// Wins when it can, blocks when it must, random otherwise
    Tactical,
}

impl OpponentKind {
    fn build(self) -> Box<dyn Opponent> {
        match self {
            OpponentKind::Random => Box::new(RandomOpponent::new()),
            OpponentKind::Tactical => Box::new(TacticalOpponent::new()),
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    opponent: OpponentKind,
    agent_player: String,
    first_player: String,
    seed: Option<u64>,
    table: PathBuf,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metadata: SummaryMetadata,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent against a scripted opponent")]
pub struct TrainArgs {
    /// Number of training games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Opponent to train against
    #[arg(long, short = 'o', value_enum, default_value_t = OpponentKind::Random)]
    pub opponent: OpponentKind,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which token makes the first move (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub first: String,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(global: &GlobalArgs, args: TrainArgs) -> Result<()> {
    let first_player = parse_player_token(&args.first, "--first")?;
    let app_config = global.app_config()?;
    let mut service = global.open_service(app_config)?;
    let agent_player = service.agent().player();

    let config = TrainingConfig {
        num_games: args.games,
        seed: args.seed,
        first_player,
        rewards: service.config().rewards,
    };

    let mut pipeline = TrainingPipeline::new(config);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new(agent_player)));
    }

    let mut opponent = args.opponent.build();
    let result = pipeline
        .run(service.agent_mut(), opponent.as_mut())
        .context("training run failed")?;

    service
        .flush()
        .with_context(|| format!("saving value table to {}", global.table.display()))?;

    print_section("Training Summary");
    print_kv("Games", &result.total_games.to_string());
    print_kv("Opponent", opponent.name());
    print_kv("Wins", &format!("{} ({})", result.wins, percent(result.win_rate)));
    print_kv("Draws", &format!("{} ({})", result.draws, percent(result.draw_rate)));
    print_kv("Losses", &format!("{} ({})", result.losses, percent(result.loss_rate)));
    print_kv("Exploration rate", &format!("{:.4}", result.final_exploration_rate));
    print_kv("Known states", &result.table_size.to_string());
    print_kv("Table", &global.table.display().to_string());

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let summary = TrainingSummaryFile {
            training: &result,
            metadata: SummaryMetadata {
                opponent: args.opponent,
                agent_player: agent_player.to_string(),
                first_player: first_player.to_string(),
                seed: args.seed,
                table: global.table.clone(),
            },
        };
        let file = std::fs::File::create(&path)
            .with_context(|| format!("creating summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
