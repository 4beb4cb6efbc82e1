//! RPC API docs - command-line tool for generating per-method API documentation.
//!
//! Reads RPC service definitions (services, methods, messages, enums and REST
//! mappings) from JSON and writes one documentation page per method.
//!
//! # Usage
//!
//! ```bash
//! rpc-api-docs [OPTIONS] <DEFINITIONS>
//! ```
//!
//! # Examples
//!
//! Generate MDX pages:
//! ```bash
//! rpc-api-docs ./lightning.json -o docs
//! ```
//!
//! Dump resolved methods as YAML from a directory of definitions:
//! ```bash
//! rpc-api-docs ./protos -f yaml -o out
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use rpc_api_docs::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("RPC API docs generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
