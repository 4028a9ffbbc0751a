//! API doc schema CLI
//!
//! Command-line interface for format negotiation and schema generation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use apidoc_schema::{
    load_catalog_auto, DocumentGenerator, FormatResolver, GeneratorOptions,
    ObjectParameterPolicy, DEFAULT_VERSION_SEPARATOR,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidoc-schema")]
#[command(about = "Resolve versioned API formats and generate model schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List concrete formats, optionally resolved for a requested format
    Formats {
        /// Advertised format identifier (repeatable)
        #[arg(long = "available", short = 'a', required = true)]
        available: Vec<String>,

        /// Requested format to resolve against the advertised ones
        #[arg(long)]
        requested: Option<String>,

        /// Version separator token
        #[arg(long, default_value = DEFAULT_VERSION_SEPARATOR)]
        separator: String,
    },

    /// Expand a single format identifier
    Expand {
        /// Format identifier, e.g. "fmt;version={1,2,3}"
        format: String,

        /// Drop versions above this one
        #[arg(long)]
        max_version: Option<u64>,

        /// Version separator token
        #[arg(long, default_value = DEFAULT_VERSION_SEPARATOR)]
        separator: String,
    },

    /// Generate the schema document for a model
    Schema {
        /// Model catalog: file path or URL (http:// or https://)
        catalog: String,

        /// Model to generate
        #[arg(long, short)]
        model: String,

        /// Generator options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Deduplicate nested models into definitions
        #[arg(long)]
        refs: bool,

        /// Emit field aliases
        #[arg(long)]
        aliases: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Derive query parameters from a model
    Params {
        /// Model catalog: file path or URL (http:// or https://)
        catalog: String,

        /// Model to derive parameters from
        #[arg(long, short)]
        model: String,

        /// Generator options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Object fields: keep, skip, or reject
        #[arg(long)]
        objects: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Formats {
            available,
            requested,
            separator,
        } => run_formats(&available, requested.as_deref(), separator),

        Commands::Expand {
            format,
            max_version,
            separator,
        } => run_expand(&format, max_version, separator),

        Commands::Schema {
            catalog,
            model,
            config,
            refs,
            aliases,
            output,
            pretty,
        } => load_options(config.as_deref()).and_then(|options| {
            let refs = options.refs || refs;
            let aliases = options.use_aliases || aliases;
            let options = options.refs(refs).use_aliases(aliases);
            run_schema(&catalog, &model, options, output, pretty)
        }),

        Commands::Params {
            catalog,
            model,
            config,
            objects,
            pretty,
        } => load_options(config.as_deref()).and_then(|options| {
            let options = match objects.as_deref() {
                Some(name) => match ObjectParameterPolicy::parse(name) {
                    Some(policy) => options.object_parameters(policy),
                    None => {
                        eprintln!(
                            "Error: unknown object policy \"{}\": expected keep, skip, or reject",
                            name
                        );
                        return Err(2);
                    }
                },
                None => options,
            };
            run_params(&catalog, &model, options, pretty)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_formats(
    available: &[String],
    requested: Option<&str>,
    separator: String,
) -> Result<(), u8> {
    let resolver = FormatResolver::for_separator(separator);
    let formats = match requested {
        Some(requested) => resolver.resolve_for_request(available, requested),
        None => resolver.collect_available(available),
    };
    print_lines(&formats);
    Ok(())
}

fn run_expand(format: &str, max_version: Option<u64>, separator: String) -> Result<(), u8> {
    let resolver = FormatResolver::for_separator(separator);
    print_lines(&resolver.expand_format(format, max_version));
    Ok(())
}

fn print_lines(formats: &[String]) {
    for format in formats {
        println!("{}", format);
    }
}

fn load_options(path: Option<&Path>) -> Result<GeneratorOptions, u8> {
    let Some(path) = path else {
        return Ok(GeneratorOptions::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        3u8
    })?;
    serde_json::from_str(&content).map_err(|e| {
        eprintln!("Error: invalid config {}: {}", path.display(), e);
        2u8
    })
}

fn load_generator(
    catalog_source: &str,
    options: GeneratorOptions,
) -> Result<DocumentGenerator, u8> {
    let catalog = load_catalog_auto(catalog_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    Ok(DocumentGenerator::new(catalog, options))
}

fn run_schema(
    catalog_source: &str,
    model: &str,
    options: GeneratorOptions,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let generator = load_generator(catalog_source, options)?;
    let document = generator.serializer_schema(model).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = to_json(&document, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_params(
    catalog_source: &str,
    model: &str,
    options: GeneratorOptions,
    pretty: bool,
) -> Result<(), u8> {
    let generator = load_generator(catalog_source, options)?;
    let params = generator.request_parameters(model).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", to_json(&params, pretty)?);
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}
