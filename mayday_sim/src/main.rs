//! Mayday Exercise Harness CLI
//!
//! Run deterministic crisis-engine exercises and report pass/fail for CI.

use clap::Parser;
use mayday_env::TokioContext;
use mayday_sim::exercises::ExerciseId;
use mayday_sim::{run_wall_clock, ExerciseResult, ExerciseRunner};
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Mayday deterministic exercise CLI
#[derive(Parser, Debug)]
#[command(name = "mayday-sim")]
#[command(about = "Run deterministic exercises against the crisis engine", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Exercise to run (full_exercise, dead_air, feed_offline, replay, all)
    #[arg(short, long, default_value = "all")]
    exercise: String,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Drive one unattended session in real time (1 s ticks) instead of
    /// the scripted exercises
    #[arg(long)]
    wall_clock: bool,

    /// Session length in seconds for --wall-clock
    #[arg(long, default_value = "30")]
    duration: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    if args.wall_clock {
        let outcome = run_wall_clock(TokioContext::shared(), Duration::from_secs(args.duration)).await;
        match outcome {
            Ok(report) => {
                if args.json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(text) => println!("{}", text),
                        Err(e) => {
                            eprintln!("Failed to serialize report: {}", e);
                            std::process::exit(1);
                        }
                    }
                } else {
                    info!(
                        "Session ended after {} min: reputation {}, trust {}, crisis level {}",
                        report.duration_minutes,
                        report.reputation,
                        report.trust,
                        report.crisis_level
                    );
                }
            }
            Err(reason) => {
                error!("Wall-clock session failed: {}", reason);
                std::process::exit(1);
            }
        }
        return;
    }

    let exercises: Vec<ExerciseId> = if args.exercise == "all" {
        ExerciseId::all()
    } else {
        match args.exercise.parse() {
            Ok(exercise) => vec![exercise],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available exercises: full_exercise, dead_air, feed_offline, replay, all");
                std::process::exit(1);
            }
        }
    };

    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let mut all_results: Vec<ExerciseResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ExerciseRunner::new(seed);

        for exercise in &exercises {
            let result = runner.run(*exercise).await;

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", exercise.name(), seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        exercise.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }
            all_results.push(result);
        }
    }

    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                std::process::exit(1);
            }
        }
    } else if failed_count == 0 {
        info!("All {} exercise runs passed", total);
    } else {
        error!("{}/{} exercise runs failed", failed_count, total);
        for result in &all_results {
            if !result.passed {
                error!(
                    "  - {} seed={}: {}",
                    result.exercise.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    if failed_count > 0 {
        std::process::exit(1);
    }
}
