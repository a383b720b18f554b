//! Headless blockweld runner (default binary).
//!
//! Loads a level JSON file, plays it with straight-drop placements and prints
//! the final report as JSON. Logging goes through `env_logger`; set
//! `RUST_LOG=debug` for per-move detail.

use anyhow::Result;
use clap::Parser;

use blockweld::cli::{run, RunArgs};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = RunArgs::parse();
    let report = run(&args)?;
    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}
