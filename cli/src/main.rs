use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use schema_merge_core::{load_schema, persist, unresolved_references};
use schema_merge_platform::{
    DEFAULT_ROOT_TYPE_OUTPUT, MergeConfig, PlatformConfig, PlatformError, ReflectOptions,
    reflect_root_type, run_merge_schemas,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "merge-schemas")]
#[command(about = "Merge the platform configuration schema into a values schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Graft the platform schema into a values schema and write the result.
    Merge(MergeArgs),
    /// Write the reflected PlatformConfig schema without merging.
    Reflect(ReflectArgs),
    /// Check that local references in schema files resolve.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// YAML run configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Values schema to extend.
    #[arg(long)]
    values_schema: Option<PathBuf>,
    /// Authored platform schema to graft in.
    #[arg(long)]
    platform_schema: Option<PathBuf>,
    /// Output path for the merged schema.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output path for the reflected root-type schema.
    #[arg(long)]
    root_type_output: Option<PathBuf>,
    /// `$id` written on the reflected root-type schema.
    #[arg(long)]
    base_schema_id: Option<String>,
}

#[derive(Debug, Args)]
struct ReflectArgs {
    /// Output path for the reflected schema.
    #[arg(long, default_value = DEFAULT_ROOT_TYPE_OUTPUT)]
    output: PathBuf,
    /// `$id` written on the reflected schema.
    #[arg(long)]
    base_schema_id: Option<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema JSON files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Merge(args) => run_merge(args),
        Command::Reflect(args) => run_reflect(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_merge(args: MergeArgs) -> Result<(), String> {
    let config = resolve_merge_config(args).map_err(|e| e.to_string())?;
    let summary = run_merge_schemas(&config).map_err(|e| e.to_string())?;

    println!(
        "Merged platform schema into '{}' ({} definitions).",
        config.output.display(),
        summary.definition_count
    );
    if !summary.unresolved.is_empty() {
        eprintln!(
            "{} unresolved reference(s) in merged schema.",
            summary.unresolved.len()
        );
    }
    Ok(())
}

/// Builds the run configuration from an optional YAML file plus flags.
fn resolve_merge_config(args: MergeArgs) -> Result<MergeConfig, PlatformError> {
    let base = args.config.as_ref().map(|path| MergeConfig::load(path)).transpose()?;

    let values_schema = args
        .values_schema
        .or_else(|| base.as_ref().map(|c| c.values_schema.clone()))
        .ok_or(PlatformError::MissingSetting("--values-schema"))?;
    let platform_schema = args
        .platform_schema
        .or_else(|| base.as_ref().map(|c| c.platform_schema.clone()))
        .ok_or(PlatformError::MissingSetting("--platform-schema"))?;
    let output = args
        .output
        .or_else(|| base.as_ref().map(|c| c.output.clone()))
        .ok_or(PlatformError::MissingSetting("--output"))?;

    let mut config = MergeConfig::new(values_schema, platform_schema, output);
    if let Some(path) = args
        .root_type_output
        .or_else(|| base.as_ref().map(|c| c.root_type_output.clone()))
    {
        config = config.with_root_type_output(path);
    }
    if let Some(id) = args
        .base_schema_id
        .or_else(|| base.and_then(|c| c.base_schema_id))
    {
        config = config.with_base_schema_id(id);
    }
    Ok(config)
}

fn run_reflect(args: ReflectArgs) -> Result<(), String> {
    let options = ReflectOptions {
        base_schema_id: args.base_schema_id,
    };
    let doc = reflect_root_type::<PlatformConfig>(&options).map_err(|e| e.to_string())?;
    persist(&doc, &args.output).map_err(|e| e.to_string())?;

    println!(
        "Wrote reflected schema with {} definition(s) to '{}'.",
        doc.definitions.len(),
        args.output.display()
    );
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = 0usize;
    for path in &args.inputs {
        let doc = load_schema(path).map_err(|e| e.to_string())?;
        for error in unresolved_references(&doc) {
            eprintln!("{}: {error}", path.display());
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(format!("{failures} unresolved reference(s)"));
    }
    println!("Validated {} schema file(s).", args.inputs.len());
    Ok(())
}
