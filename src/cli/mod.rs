use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::{env, fs};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::config::resolve::load_diagram_config;
use crate::config::DiagramConfig;
use crate::core::model::Document;
use crate::core::node::{DependencyEdge, ServiceIdentity, VersionedNode};
use crate::error::{Result, SvcgraphError};
use crate::graph::aggregate::{connection_groups, ConnectionMarker};
use crate::graph::builder::{load_graph, GraphSource, LoadedGraph, SkippedLink};
use crate::graph::ops::{
    all_nodes, connection_versions, find_cycles, graph_stats, node_adjacency, roots, GraphStats,
};
use crate::graph::traverse::{highlight_for, HighlightSet};
use crate::graph::{viz, DependencyGraph};
use crate::layout::{PositionMap, Zoom};
use crate::render::{build_scene, render_svg, render_svg_template, InteractionState, SceneInput};
use crate::util::{logging, output};

#[derive(Parser, Debug)]
#[command(name = "svcgraph")]
#[command(about = "Service version dependency diagrams", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Versions(VersionsArgs),
    Graph(GraphArgs),
    Highlight(HighlightArgs),
    Connections(ConnectionsArgs),
    Render(RenderArgs),
    Check(CheckArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct DocumentArgs {
    pub document: PathBuf,
    #[arg(long)]
    pub from_links: bool,
}

#[derive(Args, Debug)]
pub struct VersionsArgs {
    #[command(flatten)]
    pub input: DocumentArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub input: DocumentArgs,
    #[arg(long, default_value = "tree")]
    pub format: String,
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args, Debug)]
pub struct HighlightArgs {
    #[command(flatten)]
    pub input: DocumentArgs,
    pub node: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConnectionsArgs {
    #[command(flatten)]
    pub input: DocumentArgs,
    #[arg(long)]
    pub focus: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: DocumentArgs,
    #[arg(long)]
    pub focus: Option<String>,
    #[arg(long)]
    pub select: Option<String>,
    #[arg(long)]
    pub zoom: Option<u32>,
    #[arg(long = "move", value_name = "SERVICE=DX,DY")]
    pub moves: Vec<String>,
    #[arg(long, default_value = "svg")]
    pub format: String,
    #[arg(long)]
    pub template: Option<PathBuf>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: DocumentArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    output::set_quiet(cli.quiet);
    logging::init_tracing(cli.verbose, cli.quiet);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = cli.command {
        return handle_completions(args);
    }

    let config = load_diagram_config(env::current_dir()?, cli.config)?;
    match cli.command {
        Commands::Versions(args) => handle_versions(args),
        Commands::Graph(args) => handle_graph(args),
        Commands::Highlight(args) => handle_highlight(args),
        Commands::Connections(args) => handle_connections(args),
        Commands::Render(args) => handle_render(args, &config),
        Commands::Check(args) => handle_check(args),
        Commands::Completions(args) => handle_completions(args),
    }
}

fn load(input: &DocumentArgs) -> Result<LoadedGraph> {
    let doc = if input.document.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Document::from_json_str(&content).map_err(|source| SvcgraphError::Document {
            path: input.document.clone(),
            source,
        })?
    } else {
        Document::load(&input.document)?
    };
    if doc.is_empty() {
        output::info("document has no app versions");
    }
    let source = if input.from_links {
        GraphSource::Links
    } else {
        GraphSource::Auto
    };
    let loaded = load_graph(&doc, source);
    tracing::info!(
        services = loaded.index.len(),
        edges = loaded.graph.edge_count(),
        "loaded dependency graph"
    );
    Ok(loaded)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| SvcgraphError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn known_node(loaded: &LoadedGraph, key: &str) -> Result<VersionedNode> {
    let node = VersionedNode::from_key(key);
    if loaded.index.contains(&node) || loaded.graph.nodes().contains(&node) {
        Ok(node)
    } else {
        Err(SvcgraphError::UnknownNode(key.to_string()))
    }
}

fn handle_versions(args: VersionsArgs) -> Result<()> {
    let loaded = load(&args.input)?;
    if args.json {
        return print_json(&loaded.index);
    }
    for (identity, versions) in loaded.index.iter() {
        println!("{}: {}", identity, versions.join(", "));
    }
    Ok(())
}

#[derive(Serialize)]
struct GraphJson {
    nodes: Vec<GraphNodeJson>,
    edges: Vec<DependencyEdge>,
}

#[derive(Serialize)]
struct GraphNodeJson {
    id: String,
    service: String,
    version: String,
}

fn handle_graph(args: GraphArgs) -> Result<()> {
    let loaded = load(&args.input)?;
    let (graph, scope) = match args.filter.as_deref() {
        Some(pattern) => filter_graph(&loaded.graph, pattern)?,
        None => (
            loaded.graph.clone(),
            all_nodes(&loaded.graph, &loaded.index),
        ),
    };

    match args.format.to_ascii_lowercase().as_str() {
        "tree" => {
            let adjacency = node_adjacency(&graph);
            print!(
                "{}",
                viz::render_tree(&roots(&graph, &scope), &adjacency, &connection_versions(&graph))
            );
            Ok(())
        }
        "flat" => {
            let adjacency = node_adjacency(&graph);
            print!(
                "{}",
                viz::render_flat(&roots(&graph, &scope), &adjacency, &connection_versions(&graph))
            );
            Ok(())
        }
        "dot" => {
            let nodes: Vec<VersionedNode> = scope.into_iter().collect();
            print!("{}", viz::render_dot(&nodes, &connection_versions(&graph)));
            Ok(())
        }
        "json" => {
            let json = GraphJson {
                nodes: scope
                    .iter()
                    .map(|node| GraphNodeJson {
                        id: node.as_str().to_string(),
                        service: node.identity().as_str().to_string(),
                        version: node.version().to_string(),
                    })
                    .collect(),
                edges: graph.iter_edges().cloned().collect(),
            };
            print_json(&json)
        }
        other => Err(SvcgraphError::Other(anyhow::anyhow!(
            "unknown graph format '{}'",
            other
        ))),
    }
}

fn filter_graph(
    graph: &DependencyGraph,
    pattern: &str,
) -> Result<(DependencyGraph, BTreeSet<VersionedNode>)> {
    let re = regex::Regex::new(pattern).map_err(|err| SvcgraphError::Other(anyhow::Error::new(err)))?;
    let mut filtered = DependencyGraph::new();
    for edge in graph.iter_edges() {
        if re.is_match(edge.source.as_str()) || re.is_match(edge.target.as_str()) {
            filtered.insert_edge(edge.clone());
        }
    }
    let mut scope = filtered.nodes();
    scope.extend(
        graph
            .nodes()
            .into_iter()
            .filter(|node| re.is_match(node.as_str())),
    );
    Ok((filtered, scope))
}

fn handle_highlight(args: HighlightArgs) -> Result<()> {
    let loaded = load(&args.input)?;
    let focal = known_node(&loaded, &args.node)?;
    let set = highlight_for(&loaded.graph, Some(&focal));
    if args.json {
        return print_json(&set);
    }
    print_highlight(&set);
    Ok(())
}

fn print_highlight(set: &HighlightSet) {
    println!("nodes:");
    for node in &set.nodes {
        println!("  {}", node);
    }
    println!("edges:");
    for edge in &set.edges {
        println!("  {}", edge);
    }
}

#[derive(Serialize)]
struct ConnectionJson {
    key: String,
    source: String,
    target: String,
    app_versions: Vec<u64>,
    highlighted: bool,
    markers: Vec<ConnectionMarker>,
}

fn handle_connections(args: ConnectionsArgs) -> Result<()> {
    let loaded = load(&args.input)?;
    let focal = args
        .focus
        .as_deref()
        .map(|key| known_node(&loaded, key))
        .transpose()?;
    let highlight = highlight_for(&loaded.graph, focal.as_ref());

    let connections: Vec<ConnectionJson> = connection_groups(&loaded.graph)
        .into_iter()
        .map(|group| ConnectionJson {
            highlighted: group.any_highlighted(&highlight),
            markers: group.markers(&highlight),
            key: group.key.as_str().to_string(),
            source: group.source.as_str().to_string(),
            target: group.target.as_str().to_string(),
            app_versions: group.edges.iter().map(|edge| edge.app_version).collect(),
        })
        .collect();

    if args.json {
        return print_json(&connections);
    }
    for connection in &connections {
        let labels: Vec<String> = connection
            .markers
            .iter()
            .map(|marker| {
                let text = marker.label.text();
                if marker.highlighted {
                    format!("*{text}")
                } else {
                    text
                }
            })
            .collect();
        println!(
            "{} -> {} [{}]",
            connection.source,
            connection.target,
            labels.join(" ")
        );
    }
    Ok(())
}

fn handle_render(args: RenderArgs, config: &DiagramConfig) -> Result<()> {
    let loaded = load(&args.input)?;

    let mut positions = PositionMap::initial(&loaded.index, config);
    for delta in &args.moves {
        let (identity, dx, dy) = parse_move(delta)?;
        if !positions.drag(&identity, dx, dy) {
            output::warn(&format!("no service box for {}", identity));
        }
    }

    let mut interaction = InteractionState::new();
    if let Some(key) = args.focus.as_deref() {
        interaction.hover_enter(known_node(&loaded, key)?);
    }
    if let Some(key) = args.select.as_deref() {
        interaction.click(known_node(&loaded, key)?);
    }

    let mut zoom = Zoom::new(config.zoom.clone());
    if let Some(level) = args.zoom {
        zoom.set(level);
    }

    let scene = build_scene(&SceneInput {
        graph: &loaded.graph,
        index: &loaded.index,
        positions: &positions,
        config,
        interaction: &interaction,
        zoom: &zoom,
    });

    let rendered = match args.format.to_ascii_lowercase().as_str() {
        "svg" => match args.template.as_ref() {
            Some(path) => render_svg_template(path, &scene)?,
            None => render_svg(&scene)?,
        },
        "json" => {
            let mut json = serde_json::to_string_pretty(&scene)
                .map_err(|err| SvcgraphError::Other(anyhow::Error::new(err)))?;
            json.push('\n');
            json
        }
        other => {
            return Err(SvcgraphError::Other(anyhow::anyhow!(
                "unknown render format '{}'",
                other
            )))
        }
    };

    match args.output.as_ref() {
        Some(path) => write_output(path, &rendered, args.yes),
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

fn parse_move(value: &str) -> Result<(ServiceIdentity, f64, f64)> {
    let invalid = || {
        SvcgraphError::Other(anyhow::anyhow!(
            "invalid move '{}', expected app/service=DX,DY",
            value
        ))
    };
    let (identity, delta) = value.split_once('=').ok_or_else(invalid)?;
    let (dx, dy) = delta.split_once(',').ok_or_else(invalid)?;
    let dx: f64 = dx.trim().parse().map_err(|_| invalid())?;
    let dy: f64 = dy.trim().parse().map_err(|_| invalid())?;
    Ok((ServiceIdentity::from_key(identity.trim()), dx, dy))
}

fn write_output(path: &Path, content: &str, assume_yes: bool) -> Result<()> {
    if path.exists() {
        let prompt = format!("overwrite {}?", path.display());
        let confirmed = output::confirm(&prompt, assume_yes)
            .map_err(|err| SvcgraphError::Other(anyhow::Error::new(err)))?;
        if !confirmed {
            output::warn("render cancelled");
            return Ok(());
        }
    }
    fs::write(path, content)?;
    output::wrote(path);
    Ok(())
}

#[derive(Serialize)]
struct CheckJson {
    stats: GraphStats,
    cycles: Vec<Vec<String>>,
    skipped_links: Vec<SkippedLink>,
    duplicate_edges: usize,
    dropped_edges: usize,
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let loaded = load(&args.input)?;
    let report = CheckJson {
        stats: graph_stats(&loaded.graph, &loaded.index),
        cycles: find_cycles(&loaded.graph)
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|node| node.as_str().to_string()).collect())
            .collect(),
        skipped_links: loaded.skipped.clone(),
        duplicate_edges: loaded.duplicates,
        dropped_edges: loaded.dropped_unknown,
    };

    if args.json {
        return print_json(&report);
    }

    let stats = &report.stats;
    println!(
        "{} services, {} versions, {} edges in {} connections across {} app versions",
        stats.services, stats.nodes, stats.edges, stats.connections, stats.app_versions
    );
    if !report.cycles.is_empty() {
        println!("cycles:");
        for cycle in &report.cycles {
            println!("  {}", cycle.join(" <-> "));
        }
    }
    if !report.skipped_links.is_empty() {
        println!("skipped links:");
        for link in &report.skipped_links {
            let kind = if link.implicit { " (implicit)" } else { "" };
            println!(
                "  app version {}: {} -> {}{}",
                link.app_version, link.source, link.target, kind
            );
        }
    }
    if report.duplicate_edges > 0 {
        println!("ignored {} repeated edges", report.duplicate_edges);
    }
    if report.dropped_edges > 0 {
        println!("dropped {} edges with unknown endpoints", report.dropped_edges);
    }
    if report.cycles.is_empty() && report.skipped_links.is_empty() && report.dropped_edges == 0 {
        output::info("no graph issues found");
    }
    Ok(())
}

fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "svcgraph", &mut io::stdout());
    Ok(())
}
