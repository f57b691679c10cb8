use clap::{Parser, ValueEnum};
use quarry::{Execution, ExecutionConfig, Query, QuarryError, load_document, parse_variable};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    /// Discarded entries dropped, a single entry printed as a scalar.
    Simplified,
    /// Every entry, discarded ones included.
    Kept,
    /// Entry strings joined with newlines.
    Joined,
}

/// Runs a quarry query against an HTML or JSON file.
#[derive(Debug, Parser)]
#[command(name = "quarry", version)]
struct Cli {
    /// The query text, e.g. 'div/@text?transform=upper'.
    query: String,

    /// The input document. Reads standard input when omitted.
    file: Option<PathBuf>,

    /// Treat the input as JSON instead of HTML.
    #[arg(long)]
    json: bool,

    /// URL of the input, used by url: parts and ${pageUrl}/${rootUrl}.
    #[arg(long, default_value = "")]
    url: String,

    /// A starting variable as name=value. Repeatable.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    #[arg(long, value_enum, default_value_t = View::Simplified)]
    view: View,
}

fn main() -> Result<(), QuarryError> {
    env_logger::init();
    let cli = Cli::parse();

    let query = Query::compile(&cli.query)?;
    let text = match &cli.file {
        Some(path) => fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let root = load_document(&text, cli.json, &cli.url)?;
    let variables = cli
        .vars
        .iter()
        .map(|pair| parse_variable(pair))
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = ExecutionConfig::default();
    if !cli.url.is_empty() {
        config = config.with_source_url(&cli.url);
    }
    let result = Execution::new(&query)
        .with_variables(variables)
        .with_config(config)
        .run(&root);
    log::debug!("query produced {} entries", result.entries().len());

    match cli.view {
        View::Simplified => println!("{}", serde_json::to_string_pretty(&result.simplified().to_json())?),
        View::Kept => {
            let kept: Vec<serde_json::Value> = result.kept().iter().map(|v| v.to_json()).collect();
            println!("{}", serde_json::to_string_pretty(&kept)?);
        }
        View::Joined => println!("{}", result.joined()),
    }
    Ok(())
}
