//! artifact-sweep: optimum for every roll budget from 0 to a maximum.
//!
//! Budgets run in parallel (rayon); each one uses its own optimizer context.

use std::time::Instant;

use artifact_optimizer::config::{load_request, OptimizeRequest};
use artifact_optimizer::constants::MAX_ROLL_BUDGET;
use artifact_optimizer::env_config;
use artifact_optimizer::sweep::sweep_budgets;
use artifact_optimizer::types::RollBudget;

fn print_usage() {
    println!("Usage: artifact-sweep [REQUEST.json] [--max-budget N] [--json]");
    println!();
    println!("Options:");
    println!("  --max-budget N  Largest budget to solve (default: {})", MAX_ROLL_BUDGET);
    println!("  --json          Print rows as JSON instead of a table");
}

fn main() {
    env_config::init_logging();
    let args: Vec<String> = std::env::args().collect();

    let mut request_path: Option<String> = None;
    let mut max_budget = MAX_ROLL_BUDGET;
    let mut as_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--max-budget" => {
                i += 1;
                max_budget = match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(n) => n,
                    None => {
                        eprintln!("Invalid --max-budget");
                        std::process::exit(1);
                    }
                };
            }
            "--json" => {
                as_json = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
            path => request_path = Some(path.to_string()),
        }
        i += 1;
    }

    let req = match &request_path {
        Some(path) => load_request(path).unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {}", path, e);
            std::process::exit(1);
        }),
        None => OptimizeRequest::default(),
    };
    let max_budget = RollBudget::new(max_budget).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    env_config::init_rayon_threads();
    let model = req.model.build();
    let t0 = Instant::now();
    let rows = match sweep_budgets(&req.stats, &req.effective_caps(), model.as_ref(), max_budget) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if as_json {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize rows: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Model: {}", model.name());
    println!("Rolls | Damage    | EM | ATK | ER | CR | CD");
    println!("------|-----------|----|-----|----|----|----");
    for row in &rows {
        match &row.optimum {
            Some(opt) => {
                let a = &opt.allocation;
                println!(
                    "  {:2}  | {:9.4} | {:2} | {:3} | {:2} | {:2} | {:2}",
                    row.budget,
                    opt.damage,
                    a.elemental_mastery,
                    a.attack_percent,
                    a.energy_recharge,
                    a.crit_rate,
                    a.crit_damage
                );
            }
            None => println!(
                "  {:2}  | {}",
                row.budget,
                row.error.as_deref().unwrap_or("no result")
            ),
        }
    }
    println!("\nSolved {} budgets in {:.2} ms", rows.len(), t0.elapsed().as_secs_f64() * 1000.0);
}
