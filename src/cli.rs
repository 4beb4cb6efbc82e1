use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// RPC API docs - generate per-method documentation from RPC service definitions
#[derive(Parser, Debug)]
#[command(name = "rpc-api-docs")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Definition file, or a directory of definition files
    #[arg(value_name = "DEFINITIONS")]
    pub definitions_path: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "markdown")]
    pub output_format: OutputFormat,

    /// Output directory
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = "docs")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// MDX pages
    Markdown,
    /// JSON dump of each method
    Json,
    /// YAML dump of each method
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.definitions_path.exists() {
        anyhow::bail!(
            "Definitions path does not exist: {}",
            args.definitions_path.display()
        );
    }

    if args.output_dir.exists() && !args.output_dir.is_dir() {
        anyhow::bail!(
            "Output path is not a directory: {}",
            args.output_dir.display()
        );
    }

    info!("Definitions: {}", args.definitions_path.display());
    info!("Output directory: {}", args.output_dir.display());
    info!("Output format: {:?}", args.output_format);

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::definitions::load_path;
    use crate::renderer::{JsonRenderer, MarkdownRenderer, Renderer, YamlRenderer};
    use crate::service::ApiDocs;

    // Step 1: Load definitions
    info!("Loading definitions...");
    let definitions = load_path(&args.definitions_path)?;
    info!(
        "Loaded {} packages with {} methods",
        definitions.packages.len(),
        definitions.method_count()
    );

    if definitions.method_count() == 0 {
        log::warn!("No methods found in the definitions");
    }

    // Step 2: Build the type registry and services
    info!("Building documentation model...");
    let docs = ApiDocs::from_definitions(&definitions)?;

    // Step 3: Export one file per method
    let renderer: Box<dyn Renderer> = match args.output_format {
        OutputFormat::Markdown => Box::new(MarkdownRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
        OutputFormat::Yaml => Box::new(YamlRenderer),
    };
    info!("Exporting to {}...", args.output_dir.display());
    let summary = docs.export(&args.output_dir, renderer.as_ref())?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Services: {}", summary.services);
    info!("  - Methods: {}", docs.method_count());
    info!("  - Files written: {}", summary.files.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let args = CliArgs::try_parse_from(["rpc-api-docs", "lightning.json"]).unwrap();

        assert_eq!(args.definitions_path, PathBuf::from("lightning.json"));
        assert_eq!(args.output_format, OutputFormat::Markdown);
        assert_eq!(args.output_dir, PathBuf::from("docs"));
        assert!(!args.verbose);
    }

    #[test]
    fn test_parse_all_options() {
        let args = CliArgs::try_parse_from([
            "rpc-api-docs",
            "protos",
            "-f",
            "yaml",
            "-o",
            "out",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Yaml);
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(args.verbose);
    }

    #[test]
    fn test_validate_missing_definitions() {
        let args = CliArgs::try_parse_from(["rpc-api-docs", "/nonexistent/defs.json"]).unwrap();
        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_validate_output_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let defs = temp_dir.path().join("defs.json");
        let out = temp_dir.path().join("out");
        fs::write(&defs, "{}").unwrap();
        fs::write(&out, "").unwrap();

        let args = CliArgs::try_parse_from([
            OsStr::new("rpc-api-docs"),
            defs.as_os_str(),
            OsStr::new("-o"),
            out.as_os_str(),
        ])
        .unwrap();
        assert!(parse_args_from_parsed(args).is_err());
    }
}
