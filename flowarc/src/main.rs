// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use flowarc::config::DEFAULT_STEP_DEGREES;
use flowarc::feed::FeedOptions;
use flowarc::{run, ArcConfig, Curvature, RunOptions};

/// Turn origin/destination pairs into curved flow-map arcs.
///
/// The first five fields of every source row are read by position: id,
/// origin x, origin y, destination x, destination y. Output goes to an
/// `Arcs` directory beside the source, which is replaced on every run.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Source dataset: delimited text (.csv, .tsv, .txt) or GeoJSON.
    source: PathBuf,
    /// Curvature index: 1 draws half circles, larger values flatter arcs.
    curvature: Curvature,
    /// Angle between arc vertices, in degrees.
    #[arg(short, long, default_value_t = DEFAULT_STEP_DEGREES)]
    step: f64,
    /// Field delimiter for delimited text.
    #[arg(short, long)]
    delimiter: Option<char>,
    /// The delimited source has no header row.
    #[arg(long)]
    no_header: bool,
    /// Write output here instead of `Arcs/` beside the source.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// Also write an SVG preview of the arcs.
    #[arg(long)]
    svg: bool,
    /// More logging; repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Number of worker threads.
    #[cfg(feature = "parallel")]
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    #[cfg(feature = "parallel")]
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to start worker threads")?;
    }

    let config = ArcConfig::new(args.curvature, args.step).context("invalid arc configuration")?;
    let options = RunOptions {
        source: args.source,
        config,
        feed: FeedOptions {
            delimiter: args.delimiter,
            has_header: !args.no_header,
        },
        output_dir: args.out_dir,
        svg: args.svg,
    };
    let summary = run(&options)
        .with_context(|| format!("failed to generate arcs from {}", options.source.display()))?;
    println!("{summary}");
    Ok(())
}
