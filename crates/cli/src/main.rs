mod options;

use anyhow::Context;
use hackjack_autoplay::{
    run_autoplay, write_json, write_text, AutoplayConfig, AutoplayRequest, AutoplayResult,
    RunStatus,
};
use hackjack_core::{BalanceConfig, GameStateMachine, RunConfig};
use hackjack_data::{balance_path, load_balance_config, load_balance_config_or_default};
use options::{parse_cli_options, CliOptions, USAGE};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }
    init_logging(options.verbose);

    let balance = load_balance(&options)?;
    let results = run_batch(&options, &balance)?;
    for result in &results {
        println!("{}", result.summary_line());
    }
    if results.len() > 1 {
        println!("{}", batch_line(&results));
    }
    if let Some(dir) = options.trace.as_deref() {
        write_batch_summary(dir, &results)?;
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--config` wins; otherwise the shipped `assets/balance.json` when present.
fn load_balance(options: &CliOptions) -> anyhow::Result<BalanceConfig> {
    if let Some(path) = options.config.as_deref() {
        return load_balance_config(path);
    }
    let shipped = balance_path(Path::new("assets"));
    if shipped.exists() {
        return load_balance_config(&shipped);
    }
    warn!(path = %shipped.display(), "balance file missing, using defaults");
    load_balance_config_or_default(None)
}

fn run_batch(
    options: &CliOptions,
    balance: &BalanceConfig,
) -> anyhow::Result<Vec<AutoplayResult>> {
    let mut results = Vec::with_capacity(options.runs as usize);
    for run_index in 0..options.runs {
        let seed = options.seed.wrapping_add(u64::from(run_index));
        let request = build_request(options, seed);
        let config = RunConfig::new(options.mode, options.ascension, balance);
        let initial =
            GameStateMachine::with_balance(balance.clone()).start_new_run_seeded(config, seed);
        let result =
            run_autoplay(&initial, &request).with_context(|| format!("autoplay seed {seed}"))?;
        info!(
            seed,
            status = ?result.status,
            wave = result.final_metrics.wave,
            steps = result.summary.steps,
            "autoplay finished"
        );
        if let Some(dir) = options.trace.as_deref() {
            let stem = format!("run_{seed}");
            write_json(&dir.join(format!("{stem}.json")), &result)
                .with_context(|| format!("write trace for seed {seed}"))?;
            write_text(&dir.join(format!("{stem}.txt")), &result)
                .with_context(|| format!("write report for seed {seed}"))?;
        }
        results.push(result);
    }
    Ok(results)
}

fn build_request(options: &CliOptions, seed: u64) -> AutoplayRequest {
    let defaults = AutoplayConfig::default();
    let mut request = AutoplayRequest {
        config: AutoplayConfig {
            seed,
            max_steps: options.max_steps.unwrap_or(defaults.max_steps),
            rollouts: options.rollouts.unwrap_or(defaults.rollouts),
            ..defaults
        },
        ..AutoplayRequest::default()
    };
    request.targets.target_wave = options.target_wave;
    request
}

fn batch_line(results: &[AutoplayResult]) -> String {
    let runs = results.len();
    let victories = results
        .iter()
        .filter(|result| result.status == RunStatus::Victory)
        .count();
    let waves: u32 = results.iter().map(|result| result.final_metrics.wave).sum();
    let hands: u32 = results.iter().map(|result| result.summary.hands_played).sum();
    let won: u32 = results.iter().map(|result| result.summary.hands_won).sum();
    format!(
        "batch runs={runs} victories={victories} avg_wave={:.2} hand_win_rate={:.3}",
        f64::from(waves) / runs as f64,
        if hands == 0 {
            0.0
        } else {
            f64::from(won) / f64::from(hands)
        }
    )
}

fn write_batch_summary(dir: &Path, results: &[AutoplayResult]) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let rows: Vec<serde_json::Value> = results
        .iter()
        .map(|result| {
            serde_json::json!({
                "seed": result.seed,
                "mode": result.mode,
                "status": result.status,
                "wave": result.final_metrics.wave,
                "chips": result.final_metrics.chips,
                "lives": result.final_metrics.lives,
                "score": result.final_metrics.score,
                "hands_played": result.summary.hands_played,
                "hands_won": result.summary.hands_won,
                "steps": result.summary.steps,
            })
        })
        .collect();
    let path = dir.join("summary.json");
    let body = serde_json::to_string_pretty(&rows)?;
    fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
