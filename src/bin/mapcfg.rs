// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiles a configuration document and prints a summary of the result.
//!
//! ```bash
//! mapcfg config.yaml --environment development -P url=jdbc:h2:mem:test
//! RUST_LOG=mapcfg=debug mapcfg config.yaml --root conf --user-config --types types.yaml
//! ```

use clap::Parser;
use mapcfg::adapters::{CommandLineAdapter, StaticTypeCatalog};
use mapcfg::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mapcfg", version, about = "Compile a mapcfg configuration document")]
struct Args {
    /// Configuration document to compile
    document: PathBuf,

    /// Environment to select instead of the document default
    #[arg(short, long)]
    environment: Option<String>,

    /// Variable override as key=value (repeatable)
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE")]
    properties: Vec<String>,

    /// Also read overrides from environment variables with this prefix
    #[arg(long, value_name = "PREFIX")]
    env_prefix: Option<String>,

    /// Directory to resolve resources against (repeatable, searched in order)
    #[arg(short, long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Also search the per-user configuration directory for resources
    #[arg(long)]
    user_config: bool,

    /// YAML catalog describing the application types
    #[arg(long, value_name = "FILE")]
    types: Option<PathBuf>,
}

fn builder(args: &Args) -> Result<SessionFactoryBuilder> {
    let mut builder = SessionFactoryBuilder::new()
        .with_source(Box::new(CommandLineAdapter::from_pairs(&args.properties)));

    if let Some(prefix) = &args.env_prefix {
        builder = builder.with_env_prefix(prefix.clone());
    }

    let mut roots = args.roots.clone();
    if roots.is_empty() {
        let parent = args.document.parent().filter(|p| !p.as_os_str().is_empty());
        roots.push(parent.map_or_else(|| PathBuf::from("."), Path::to_path_buf));
    }
    let mut loader = FileSystemResourceLoader::new(roots);
    if args.user_config {
        loader = loader.with_default_location("mapcfg", "org")?;
    }
    builder = builder.with_resource_loader(loader);

    if let Some(path) = &args.types {
        let catalog = StaticTypeCatalog::from_yaml(&std::fs::read_to_string(path)?)?;
        builder = builder.with_types(catalog);
    }
    Ok(builder)
}

fn print_summary(configuration: &Configuration) {
    println!(
        "environment:  {}",
        configuration.environment().map_or("-", |e| e.id())
    );
    if let Some(environment) = configuration.environment() {
        println!(
            "data source:  {} ({})",
            environment.data_source_factory().type_ref(),
            environment.data_source().url().unwrap_or("-")
        );
    }
    println!("database id:  {}", configuration.database_id().unwrap_or("-"));
    println!("variables:    {}", configuration.variables().len());
    println!("aliases:      {}", configuration.type_aliases().len());
    println!("handlers:     {}", configuration.type_handlers().len());
    println!("interceptors: {}", configuration.interceptors().len());
    println!("mappers:      {}", configuration.mappers().len());
    for mapper in configuration.mappers().iter() {
        println!("  {mapper}");
    }
    println!("statements:   {}", configuration.mapped_statements().count());
    for statement in configuration.mapped_statements() {
        println!("  {} {}", statement.kind, statement.id);
    }
}

fn run(args: &Args) -> Result<()> {
    let factory = builder(args)?.build_from_path(
        &args.document,
        args.environment.as_deref(),
        None,
    )?;
    print_summary(factory.configuration());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
