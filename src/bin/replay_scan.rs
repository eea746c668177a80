//! Replay a scripted quote-search session and print what the viewer saw.
//!
//! Usage:
//!   cargo run --bin replay_scan -- session.json
//!   cargo run --bin replay_scan -- session.json --query "other quote" --compact
//!
//! The report is written to stdout as JSON. Set `RUST_LOG=debug` to trace
//! every event.

use std::path::PathBuf;

use pdf_quote_locator::replay::ReplayScript;

struct ReplayConfig {
    script_path: PathBuf,
    query_override: Option<String>,
    compact: bool,
}

impl ReplayConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut script_path = None;
        let mut query_override = None;
        let mut compact = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--query" | "-q" => {
                    i += 1;
                    if i < args.len() {
                        query_override = Some(args[i].clone());
                    }
                },
                "--compact" => {
                    compact = true;
                },
                other => {
                    script_path = Some(PathBuf::from(other));
                },
            }
            i += 1;
        }

        Some(Self {
            script_path: script_path?,
            query_override,
            compact,
        })
    }
}

fn main() {
    env_logger::init();

    let Some(config) = ReplayConfig::from_args() else {
        eprintln!("Usage: replay_scan <script.json> [--query <quote>] [--compact]");
        std::process::exit(2);
    };

    let mut script = match ReplayScript::from_path(&config.script_path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to load {}: {}", config.script_path.display(), e);
            std::process::exit(1);
        },
    };

    if let Some(query) = config.query_override {
        script.query = query;
    }

    let report = match script.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            std::process::exit(1);
        },
    };

    let json = if config.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    };

    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize report: {}", e);
            std::process::exit(1);
        },
    }
}
