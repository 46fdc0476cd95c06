// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! flowlink CLI entrypoint.
//!
//! By default this runs the interactive TUI. `--export-dot`, `--print-panel` and `--resolve`
//! run headless and print to stdout.

use std::error::Error;
use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use flowlink::config::{load_config, AppConfig};
use flowlink::format::export_dot;
use flowlink::model::Workflow;
use flowlink::render::render_panel;
use flowlink::sync::{DispatchOutcome, PanelViewport, StepSync};
use flowlink::tui::{self, WorkflowSource};
use log::{error, info, LevelFilter};

/// Panel height assumed by `--resolve`.
const HEADLESS_VIEWPORT_ROWS: usize = 20;

#[derive(Debug, Parser)]
#[command(name = "flowlink", version, about)]
struct Args {
    /// Workflow JSON file. Omit to open the built-in demo workflow.
    workflow: Option<PathBuf>,

    /// Configuration file (defaults to ./flowlink.toml, then the platform config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// Write logs here. Without it the TUI runs with logging switched off.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the workflow as Graphviz DOT and exit.
    #[arg(long, conflicts_with_all = ["print_panel", "resolve"])]
    export_dot: bool,

    /// Print the rendered panel JSON and exit.
    #[arg(long, conflicts_with = "resolve")]
    print_panel: bool,

    /// Run the click pipeline for a diagram node id, print its trace and exit.
    #[arg(long, value_name = "RAW_ID")]
    resolve: Option<String>,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.export_dot || self.print_panel || self.resolve.is_some()
    }

    fn source(&self) -> WorkflowSource {
        self.workflow
            .clone()
            .map_or(WorkflowSource::Demo, WorkflowSource::File)
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    builder.filter_level(level);
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Anything on stderr would tear through the alternate screen.
        None if !args.is_headless() => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {}
    }
    builder.try_init()?;
    Ok(())
}

/// Runs the pipeline for `raw_id` against a fresh panel and reports every recorded decision.
fn resolve_report(workflow: &Workflow, config: &AppConfig, raw_id: &str) -> Result<String, Box<dyn Error>> {
    let panel = render_panel(workflow, config.panel_options(), 1)?;
    let mut sync = StepSync::for_panel(&config.sync_config(), workflow, &panel);
    let mut viewport = PanelViewport::new(&panel, None, HEADLESS_VIEWPORT_ROWS);

    let outcome = sync.activate(raw_id, &mut viewport, Instant::now());

    let mut report = String::new();
    for entry in sync.trace().entries() {
        writeln!(report, "{entry}")?;
    }
    match outcome {
        DispatchOutcome::Highlighted(outcome) => writeln!(
            report,
            "highlighted {} at rows {}..={} ({}), scrolled to row {}",
            outcome.step, outcome.rows.start, outcome.rows.end, outcome.target, outcome.scroll_row
        )?,
        DispatchOutcome::Failed(err) => writeln!(report, "failed: {err}")?,
        DispatchOutcome::Missed | DispatchOutcome::Ignored => writeln!(report, "no node")?,
    }
    Ok(report)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_ref())?;
    let source = args.source();
    info!(source:% = source.label(), headless = args.is_headless(); "starting");

    if !args.is_headless() {
        return tui::run(source, config);
    }

    let workflow = source.load()?;
    if args.export_dot {
        print!("{}", export_dot(&workflow));
    } else if args.print_panel {
        let panel = render_panel(&workflow, config.panel_options(), 1)?;
        println!("{}", panel.text());
    } else if let Some(raw_id) = args.resolve.as_deref() {
        print!("{}", resolve_report(&workflow, &config, raw_id)?);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = init_logging(&args) {
        eprintln!("flowlink: failed to initialise logging: {err}");
    }

    if let Err(err) = run(args) {
        error!(error:% = err; "run failed");
        eprintln!("flowlink: {err}");
        std::process::exit(1);
    }
}
