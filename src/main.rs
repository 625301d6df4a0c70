use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use momentum_board::{
    render::{HtmlSurface, MarkdownSurface, Surface},
    render_dataset, CachedSource, DatasetConfig, FileSource,
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Html,
}

#[derive(Debug, Parser)]
#[command(name = "momentum_board")]
#[command(about = "Render a momentum spreadsheet range as a formatted table")]
#[command(version)]
struct Cli {
    /// Dataset config (YAML or JSON); repeat to render several datasets
    #[arg(short, long, required = true, env = "MOMENTUM_BOARD_CONFIG")]
    config: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the config's row limit
    #[arg(long)]
    max_rows: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // ─── init logging (stderr keeps stdout for the table) ────────────
    let default = if cli.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        error!("render failed: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    // every dataset goes onto the same page
    let mut surface: Box<dyn Surface> = match cli.format {
        OutputFormat::Markdown => Box::new(MarkdownSurface::new(writer)),
        OutputFormat::Html => Box::new(HtmlSurface::new(writer)),
    };

    let source = CachedSource::new(FileSource);
    for path in &cli.config {
        let mut config = DatasetConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        if cli.max_rows.is_some() {
            config.max_rows = cli.max_rows;
        }
        info!(config = %path.display(), source = %config.source.display(), "rendering");

        render_dataset(&config, &source, surface.as_mut())
            .with_context(|| format!("rendering {}", config.title))?;
    }

    surface.finish()?;
    Ok(())
}
