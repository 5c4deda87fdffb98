//! sonic-graph - play a note-link graph as music
//!
//! Run with: cargo run -- --graph vault.json

mod audio;
mod cli;
mod demo;
mod ui;

use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use sonic_graph::mapping::{MappingConfig, Spacing};
use sonic_graph::scheduler::{self, Clock, MonotonicClock, PollInterval, Scheduler};
use sonic_graph::{GraphNode, MappingEngine, StaticGraph};

use audio::Output;
use cli::Cli;
use ui::UiApp;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let mut config = cli.apply(load_config(cli.config.as_deref())?);
    let mut nodes = load_graph(&cli)?;

    if let Some(center) = &cli.center {
        let graph = StaticGraph::new(nodes)?;
        nodes = graph
            .neighborhood(center, cli.depth)?
            .into_iter()
            .map(|(node, _)| node.clone())
            .collect();
        // Rings play outward from the center
        config.timeline.spacing = Spacing::Sequential;
        tracing::info!(
            center = %center,
            depth = cli.depth,
            nodes = nodes.len(),
            "local soundscape"
        );
    }

    let engine = MappingEngine::new(config);
    let output = Output::open(!cli.no_audio);

    if cli.headless {
        play_headless(&engine, &nodes, output)
    } else {
        let mut terminal = ratatui::init();
        let result = UiApp::new(engine, nodes, output).run(&mut terminal);
        ratatui::restore();
        result
    }
}

fn init_tracing(cli: &Cli) -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None if cli.headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        // stderr belongs to the terminal UI
        None => {}
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> EyreResult<MappingConfig> {
    let Some(path) = path else {
        return Ok(MappingConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).wrap_err_with(|| format!("invalid config {}", path.display()))
}

fn load_graph(cli: &Cli) -> EyreResult<Vec<GraphNode>> {
    let Some(path) = &cli.graph else {
        tracing::info!(size = cli.demo_size, "using demo vault");
        return Ok(demo::vault(cli.demo_size));
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read graph {}", path.display()))?;
    let nodes: Vec<GraphNode> = serde_json::from_str(&text)
        .wrap_err_with(|| format!("invalid graph export {}", path.display()))?;
    tracing::info!(nodes = nodes.len(), path = %path.display(), "graph loaded");
    Ok(nodes)
}

fn play_headless(
    engine: &MappingEngine,
    nodes: &[GraphNode],
    mut output: Output,
) -> EyreResult<()> {
    let notes = engine.map_nodes(nodes);
    let interval = PollInterval::for_note_count(notes.len());
    let clock = MonotonicClock::new();

    let mut player = Scheduler::new();
    if !player.start(notes, clock.now()) {
        println!("Nothing to play.");
        return Ok(());
    }

    let state =
        scheduler::run_blocking(&mut player, &clock, interval, &mut output, &mut (), |_| true);
    output.silence();

    let stats = player.stats();
    println!(
        "{}: {} notes played, {} failed, {:.1}s",
        state,
        stats.triggered,
        stats.failed,
        player.elapsed(clock.now())
    );
    Ok(())
}
