use std::collections::HashMap;

use totals_backtest::{
    BacktestConfig, BacktestHarness, BacktestOutcome, BetResult, SampleConfig,
};
use totals_core::{round_to, AdjustmentContext, GameRecord, TeamRecord};
use totals_data::{
    fallback_games, generate_games, CsvStorage, FileContextProvider, SyntheticConfig,
};
use totals_signals::{CachedContextProvider, ContextProvider};

fn run(games: &[GameRecord], config: BacktestConfig) -> totals_backtest::BacktestRun {
    BacktestHarness::new(config).run(games).unwrap()
}

fn outcome_at(outcomes: &[BacktestOutcome], index: usize) -> Option<&BacktestOutcome> {
    outcomes.iter().find(|o| o.index == index)
}

#[test]
fn fallback_log_runs_end_to_end() {
    let games = fallback_games();
    let result = run(&games, BacktestConfig::default());

    let accounted = result.outcomes.len()
        + result.skipped_insufficient_history
        + result.skipped_unusable
        + result.skipped_errors;
    assert_eq!(accounted, games.len());
    assert_eq!(result.skipped_insufficient_history, 4);
    assert!(!result.outcomes.is_empty());

    for o in &result.outcomes {
        assert!(o.index >= 4);
        assert_eq!(o.predicted_total, round_to(o.predicted_total, 1));
        assert_eq!(o.edge, round_to(o.predicted_total - o.market_total, 2));
        let expected = if (o.predicted_total - o.market_total).abs() > 12.0 {
            BetResult::Filtered
        } else if o.edge == 0.0 {
            BetResult::Push
        } else if (o.predicted_total > o.market_total)
            == (f64::from(o.actual_total) > o.market_total)
        {
            BetResult::Win
        } else {
            BetResult::Loss
        };
        assert_eq!(o.result, expected);
    }

    let s = &result.summary;
    assert_eq!(s.total_evaluated, result.outcomes.len());
    assert_eq!(s.passes, 0);
    assert_eq!(s.wins + s.losses + s.pushes + s.filtered, s.total_evaluated);
    assert!(result.outcomes.iter().all(|o| o.actionable == o.is_bet()));
}

#[test]
fn outcomes_depend_only_on_the_past() {
    let games = fallback_games();
    let baseline = run(&games, BacktestConfig::default());

    for cut in [8, 15, 22, 29] {
        let mut altered = games.clone();
        for g in &mut altered[cut + 1..] {
            g.home_points += 17;
            g.away_points = g.away_points.saturating_sub(9);
            g.market_total = g.market_total.map(|m| m + 6.5);
        }
        let changed = run(&altered, BacktestConfig::default());

        for index in 0..=cut {
            assert_eq!(
                outcome_at(&baseline.outcomes, index),
                outcome_at(&changed.outcomes, index),
                "index {index} changed when games after {cut} were altered"
            );
        }
    }
}

#[test]
fn three_games_with_min_four_yield_no_outcomes() {
    let games: Vec<GameRecord> = fallback_games().into_iter().take(3).collect();
    let result = run(&games, BacktestConfig::default().with_min_training_games(4));
    assert!(result.outcomes.is_empty());
    assert_eq!(result.skipped_insufficient_history, 3);
}

#[test]
fn context_from_file_shifts_predictions() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("context.json");
    let ctx = AdjustmentContext::empty().with_records(
        ["Boston Celtics", "Denver Nuggets", "Golden State Warriors", "Phoenix Suns"]
            .into_iter()
            .map(|t| (t.to_string(), TeamRecord::new(15, 5)))
            .collect::<HashMap<_, _>>(),
    );
    totals_data::save_context(&path, &ctx).unwrap();

    let mut provider = CachedContextProvider::new(
        FileContextProvider::new(&path),
        chrono::Duration::minutes(10),
        std::sync::Arc::new(totals_signals::SystemClock),
    );
    let loaded = provider.resolve();
    assert_eq!(loaded, ctx);
    assert_eq!(provider.inner().name(), "file");

    let games = fallback_games();
    let plain = run(&games, BacktestConfig::default());
    let adjusted = BacktestHarness::new(BacktestConfig::default())
        .with_context(loaded)
        .run(&games)
        .unwrap();

    let moved = plain
        .outcomes
        .iter()
        .zip(&adjusted.outcomes)
        .filter(|(a, b)| a.predicted_total != b.predicted_total)
        .count();
    assert!(moved > 0);
    assert!(adjusted.outcomes.iter().all(|o| o.adjustment >= 0.0));
}

#[test]
fn synthetic_league_with_all_options() {
    let games = generate_games(&SyntheticConfig::default().with_games(400)).unwrap();
    let mut config = BacktestConfig::default()
        .with_recency_weighting(true)
        .with_min_training_games(60)
        .with_multiplier(1.02);
    config.model.team_home_court = true;

    let result = run(&games, config);
    assert!(result.summary.total_evaluated > 200);
    assert!(result.summary.wilson_ci_lower <= result.summary.win_rate);
    assert!(result.summary.win_rate <= result.summary.wilson_ci_upper);
}

#[test]
fn sampled_and_sweep_agree_on_shape() {
    let games = generate_games(&SyntheticConfig::default().with_games(250)).unwrap();
    let ctx = AdjustmentContext::empty();

    let sample = SampleConfig::default().with_runs(4).with_sample_size(15).with_min_index(100);
    let report =
        totals_backtest::run_sampled(&games, &BacktestConfig::default(), &sample, &ctx).unwrap();
    assert_eq!(report.runs.len(), 4);
    assert!(report.runs.iter().all(|r| r.indices.len() == 15));

    let sweep = totals_backtest::sweep_multipliers(
        &games,
        &BacktestConfig::default(),
        &[0.98, 1.0, 1.02],
        &ctx,
    )
    .unwrap();
    assert_eq!(sweep.rows.len(), 3);
    if let Some(best) = &sweep.best {
        assert!(sweep
            .rows
            .iter()
            .all(|r| r.summary.win_rate <= best.summary.win_rate));
    }
}

#[test]
fn min_edge_from_config_stops_small_bets() {
    let games = fallback_games();
    let base = run(&games, BacktestConfig::default());

    let mut app = totals_core::AppConfig::default();
    app.edge.min_edge = 100.0;
    let gated = run(&games, BacktestConfig::from(&app));

    assert!(base.summary.bets > 0);
    assert_eq!(gated.summary.bets, 0);
    assert_eq!(gated.summary.units, rust_decimal::Decimal::ZERO);
    assert_eq!(gated.summary.passes, base.summary.bets);
    assert!(gated.outcomes.iter().all(|o| !o.actionable));
}

#[test]
fn outcomes_write_as_csv() {
    let games = fallback_games();
    let result = run(&games, BacktestConfig::default());

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("outcomes.csv");
    CsvStorage::write_records(&path, &result.outcomes).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(concat!(
            "index,date,home_team,away_team,predicted_total,market_total,edge,",
            "actual_total,lean,result,actionable,adjustment,training_games"
        ))
    );
    assert_eq!(lines.count(), result.outcomes.len());
}
