use anyhow::{Context, Result};
use clap::Parser;
use erdflow::{Diagram, load_config};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "erdflow", version, about = "Lay out a schema and print the diagram scene as JSON")]
struct Args {
    /// Schema file, or '-' for stdin
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Render the scene as if this table were hovered
    #[arg(long)]
    hover: Option<String>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let input = read_input(&args.input)?;

    let mut diagram = Diagram::from_text(&input, config);
    for d in diagram.diagnostics() {
        eprintln!("line {}: {}", d.line, d.error);
    }
    if let Some(table) = args.hover.as_deref() {
        if diagram.schema().table(table).is_none() {
            anyhow::bail!("--hover: no table named {table}");
        }
        diagram.hover(Some(table));
    }

    let scene = diagram.scene();
    let json = if args.pretty {
        serde_json::to_string_pretty(&scene)?
    } else {
        serde_json::to_string(&scene)?
    };

    match args.output {
        Some(path) => fs::write(&path, json + "\n")
            .with_context(|| format!("Error writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Error reading stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
}
