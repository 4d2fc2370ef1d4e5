//! Print the OpenAPI document for external tooling.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use shuttle_backend::doc::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// Dump the REST API description.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Args {
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let rendered = match args.format {
        Format::Json => doc.to_pretty_json().wrap_err("render OpenAPI JSON")?,
        Format::Yaml => doc.to_yaml().wrap_err("render OpenAPI YAML")?,
    };
    println!("{rendered}");
    Ok(())
}
