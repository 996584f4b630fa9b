use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use halt_breakpoints::{decode_breakpoints, encode_breakpoints, Predicate, PredicateCatalog};
use halt_config::HaltConfig;
use halt_proto::JsonDifferenceBreakpoint;
use halt_session::DebugSession;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "halt", version, about = "halt debugger client (breakpoints, payload replay)")]
struct Cli {
    /// Directory searched for `halt.toml` / `.halt.toml`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the breakpoints stored in a JSON file
    Show(ShowArgs),
    /// Apply a newline-delimited stream of engine payloads and summarise the session
    Replay(ReplayArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// JSON file holding one breakpoint or an array of breakpoints
    file: PathBuf,
    /// Re-encode the breakpoints as JSON instead of rendering them
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReplayArgs {
    /// File with one JSON payload per line
    file: PathBuf,
    /// Breakpoints the engine may report as fired (JSON object or array)
    #[arg(long)]
    breakpoints: Option<PathBuf>,
    /// Trace export of an earlier run; prints the matching difference breakpoint
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Write the recorded traces to this file
    #[arg(long)]
    export_traces: Option<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli.root)?;
    match cli.command {
        Command::Show(args) => show(&config, args),
        Command::Replay(args) => replay(&config, args),
    }
}

fn load_config(root: &Path) -> Result<HaltConfig> {
    let loaded = halt_config::load_for_root(root)?;
    halt_config::init_tracing(&loaded.config.logging);

    if let Some(path) = &loaded.path {
        tracing::debug!(target: "halt.cli", path = %path.display(), "loaded config");
        for warning in &loaded.warnings {
            tracing::warn!(target: "halt.cli", path = %path.display(), "{warning}");
        }
    }
    Ok(loaded.config)
}

fn show(config: &HaltConfig, args: ShowArgs) -> Result<i32> {
    let text = read_file(&args.file)?;
    let breakpoints = decode_breakpoints(&text)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let catalog = config.session.catalog();
    for breakpoint in &breakpoints {
        for predicate in breakpoint.chain() {
            warn_unknown_names(&catalog, breakpoint.id().as_str(), predicate);
        }
    }

    if args.json {
        let value: serde_json::Value = serde_json::from_str(&encode_breakpoints(&breakpoints)?)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(0);
    }

    for (idx, breakpoint) in breakpoints.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        let paused = if breakpoint.is_paused() { " (paused)" } else { "" };
        println!("# {}{paused}", breakpoint.id());
        println!("{}", breakpoint.display());
    }
    Ok(0)
}

fn warn_unknown_names(catalog: &PredicateCatalog, breakpoint_id: &str, predicate: &Predicate) {
    if !catalog.contains(predicate.name()) {
        tracing::warn!(
            target: "halt.cli",
            breakpoint_id,
            predicate = predicate.name(),
            "predicate is not in the catalog"
        );
    }
    for child in predicate.children() {
        warn_unknown_names(catalog, breakpoint_id, child);
    }
}

#[derive(Serialize)]
struct ReplaySummary {
    payloads: usize,
    failed_lines: Vec<usize>,
    initialized: bool,
    running: bool,
    ended: bool,
    traces: usize,
    last_trace_id: Option<u64>,
    fired: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    difference_breakpoint: Option<JsonDifferenceBreakpoint>,
}

fn replay(config: &HaltConfig, args: ReplayArgs) -> Result<i32> {
    let text = read_file(&args.file)?;
    let mut session = DebugSession::with_trace_history_limit(config.session.trace_history_limit);
    session.set_timeout(config.session.step_timeout_secs);
    if let Some(path) = &args.breakpoints {
        let breakpoints = decode_breakpoints(&read_file(path)?)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        for breakpoint in breakpoints {
            session.breakpoints_mut().insert(breakpoint);
        }
    }

    let mut payloads = 0;
    let mut failed_lines = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        match session.apply_json(line) {
            Ok(effect) => {
                payloads += 1;
                tracing::trace!(target: "halt.cli", line = line_no, ?effect, "applied payload");
            }
            Err(err) => {
                eprintln!("{}:{line_no}: {err}", args.file.display());
                failed_lines.push(line_no);
            }
        }
    }

    let difference_breakpoint = match &args.reference {
        Some(path) => {
            let reference = read_file(path)?;
            session
                .import_traces(&reference)
                .with_context(|| format!("failed to import {}", path.display()))?;
            Some(session.stop_if_different())
        }
        None => None,
    };

    if let Some(path) = &args.export_traces {
        std::fs::write(path, session.export_traces()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let summary = ReplaySummary {
        payloads,
        failed_lines,
        initialized: session.is_initialized(),
        running: session.is_running(),
        ended: session.has_ended(),
        traces: session.traces().len(),
        last_trace_id: session.traces().last_id(),
        fired: session
            .breakpoints()
            .fired()
            .map(|id| id.as_str().to_string())
            .collect(),
        difference_breakpoint,
    };
    print_summary(&summary, args.json)?;

    Ok(if summary.failed_lines.is_empty() { 0 } else { 1 })
}

fn print_summary(summary: &ReplaySummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("replay:");
    println!("  payloads: {}", summary.payloads);
    if !summary.failed_lines.is_empty() {
        println!("  failed_lines: {:?}", summary.failed_lines);
    }
    println!("  initialized: {}", summary.initialized);
    println!("  running: {}", summary.running);
    println!("  ended: {}", summary.ended);
    match summary.last_trace_id {
        Some(id) => println!("  traces: {} (last id {id})", summary.traces),
        None => println!("  traces: 0"),
    }
    println!("  fired: {}", summary.fired.join(", "));
    if let Some(bp) = &summary.difference_breakpoint {
        println!("  difference_breakpoint:");
        println!("    current_position: {}", bp.current_position);
        println!("    steps: {}", bp.chain.len());
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
