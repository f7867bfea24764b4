//! artifact-optimize: best substat roll allocation for one request file.
//!
//! Prints the optimum as JSON. Command-line flags override the request file.

use std::path::PathBuf;

use artifact_optimizer::config::{load_request, OptimizeRequest};
use artifact_optimizer::damage_model::ModelKind;
use artifact_optimizer::env_config;
use artifact_optimizer::optimize;
use artifact_optimizer::types::Stat;

fn print_usage() {
    println!("Usage: artifact-optimize [REQUEST.json] [--budget N] [--model NAME] [--main-stat STAT]");
    println!();
    println!("Options:");
    println!("  --budget N        Total substat rolls (default: request file, else 5)");
    println!("  --model NAME      placeholder | stat_scaling");
    println!("  --main-stat STAT  em | atk | er | cr | cd (excluded from substats)");
}

fn fail(msg: &str) -> ! {
    eprintln!("{}", msg);
    print_usage();
    std::process::exit(1);
}

fn parse_args() -> (Option<PathBuf>, Option<f64>, Option<ModelKind>, Option<Stat>) {
    let args: Vec<String> = std::env::args().collect();
    let mut request = None;
    let mut budget = None;
    let mut model = None;
    let mut main_stat = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--budget" => {
                i += 1;
                let raw = args.get(i).unwrap_or_else(|| fail("--budget needs a value"));
                budget = Some(
                    raw.parse()
                        .unwrap_or_else(|_| fail(&format!("Invalid --budget value: {}", raw))),
                );
            }
            "--model" => {
                i += 1;
                let raw = args.get(i).unwrap_or_else(|| fail("--model needs a value"));
                model = Some(raw.parse().unwrap_or_else(|e: String| fail(&e)));
            }
            "--main-stat" => {
                i += 1;
                let raw = args.get(i).unwrap_or_else(|| fail("--main-stat needs a value"));
                main_stat = Some(raw.parse().unwrap_or_else(|e: String| fail(&e)));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => fail(&format!("Unknown argument: {}", other)),
            path => request = Some(PathBuf::from(path)),
        }
        i += 1;
    }
    (request, budget, model, main_stat)
}

fn main() {
    env_config::init_logging();
    let (request_path, budget, model, main_stat) = parse_args();

    let mut req = match request_path {
        Some(path) => load_request(&path).unwrap_or_else(|e| {
            eprintln!("Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => OptimizeRequest::default(),
    };
    if let Some(b) = budget {
        req.roll_budget = b;
    }
    if let Some(m) = model {
        req.model = m;
    }
    if main_stat.is_some() {
        req.main_stat = main_stat;
    }

    let result = req.budget().and_then(|budget| {
        let model = req.model.build();
        optimize(&req.stats, budget, &req.effective_caps(), model.as_ref())
    });

    match result {
        Ok(optimum) => match serde_json::to_string_pretty(&optimum) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
