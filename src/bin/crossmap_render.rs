use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use crossmap::{dashboard::{DashboardConfig, render_html},
               warn::trace_set};

#[derive(clap::Parser, Debug)]
/// Render a crossfilter dashboard, described by a JSON file, to a
/// standalone HTML page.
struct Args {
    /// Path to the JSON description; data paths in it are relative to
    /// its directory.
    #[clap(required(true))]
    config: PathBuf,

    /// Where to write the page (default: stdout)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Show what is rendered on stderr (same as setting CROSSMAP_TRACE=1)
    #[clap(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.trace {
        trace_set(true);
    }
    let config = DashboardConfig::from_path(&args.config)?;
    let base_dir = args.config.parent().map(PathBuf::from).unwrap_or_default();
    let html = render_html(config, &base_dir)?;
    match &args.output {
        Some(path) => std::fs::write(path, html).with_context(|| format!("writing {path:?}"))?,
        None => {
            let mut outp = std::io::stdout().lock();
            outp.write_all(html.as_bytes())?;
            outp.flush()?;
        }
    }
    Ok(())
}
