//! Training pipeline behavior over many games

use std::sync::{Arc, Mutex};

use ttt_learner::{
    Result,
    pipeline::{
        MetricsObserver, Observer, RandomOpponent, TacticalOpponent, TrainingConfig,
        TrainingPipeline,
    },
    q_learning::{AgentConfig, LearnReport, TdAgent},
    tictactoe::{GameOutcome, Player},
};

fn config(num_games: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        num_games,
        seed: Some(seed),
        ..TrainingConfig::default()
    }
}

/// Forwards events to a shared metrics observer so the test can read it afterwards
struct Shared(Arc<Mutex<MetricsObserver>>);

impl Observer for Shared {
    fn on_game_end(
        &mut self,
        game_num: usize,
        outcome: GameOutcome,
        report: &LearnReport,
    ) -> Result<()> {
        self.0.lock().unwrap().on_game_end(game_num, outcome, report)
    }
}

#[test]
fn counts_add_up_and_exploration_decays() {
    let mut agent = TdAgent::new(AgentConfig::default()).unwrap();
    let mut pipeline = TrainingPipeline::new(config(300, 42));
    let result = pipeline.run(&mut agent, &mut RandomOpponent::new()).unwrap();

    assert_eq!(result.total_games, 300);
    assert_eq!(result.wins + result.draws + result.losses, 300);
    assert!((result.win_rate + result.draw_rate + result.loss_rate - 1.0).abs() < 1e-9);
    assert!(result.final_exploration_rate < 0.9);
    assert!(result.final_exploration_rate >= 0.05);
    assert_eq!(result.table_size, agent.value_table().size());
}

#[test]
fn observers_see_every_game() {
    let metrics = Arc::new(Mutex::new(MetricsObserver::new(Player::O)));
    let mut agent = TdAgent::new(AgentConfig::default()).unwrap();
    let mut pipeline =
        TrainingPipeline::new(config(40, 8)).with_observer(Box::new(Shared(metrics.clone())));
    let result = pipeline.run(&mut agent, &mut TacticalOpponent::new()).unwrap();

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(summary.total_games, 40);
    assert_eq!(summary.wins, result.wins);
    assert_eq!(summary.draws, result.draws);
    assert_eq!(summary.losses, result.losses);
    assert!(summary.avg_agent_moves >= 1.0);
}

#[test]
fn seeded_training_is_reproducible() {
    let run = |seed| {
        let mut agent = TdAgent::new(AgentConfig::default()).unwrap();
        let mut pipeline = TrainingPipeline::new(config(100, seed));
        let result = pipeline.run(&mut agent, &mut RandomOpponent::new()).unwrap();
        (result, agent.value_table().clone())
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn agent_learns_to_beat_random_play() {
    let config = AgentConfig::default().with_exploration(0.3, 0.99, 0.0);
    let mut agent = TdAgent::new(config).unwrap();
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        num_games: 2000,
        seed: Some(3),
        first_player: Player::O,
        ..TrainingConfig::default()
    });
    pipeline.run(&mut agent, &mut RandomOpponent::new()).unwrap();

    // Evaluate the learned policy with exploration switched off.
    let greedy = AgentConfig::default().with_exploration(0.0, 1.0, 0.0);
    let mut evaluator = TdAgent::new(greedy)
        .unwrap()
        .with_value_table(agent.value_table().clone());
    let mut evaluation = TrainingPipeline::new(TrainingConfig {
        num_games: 300,
        seed: Some(4),
        first_player: Player::O,
        ..TrainingConfig::default()
    });
    let result = evaluation.run(&mut evaluator, &mut RandomOpponent::new()).unwrap();

    assert!(result.loss_rate < 0.2, "loss rate {}", result.loss_rate);
}
