mod config;

use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use valinor_encoded_values::{AttributeRegistry, DecimalValue, EdgeId, EdgeRecordStore, ValueKind};
use valinor_maxspeed::attributes::{Country, RoadClass, State, Surface, UrbanDensity};
use valinor_maxspeed::{
    EdgeAttributes, FillStats, LegalSpeedEngine, OsmParsers, OsmWay, RelationContext, Tags,
};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "valinor-cli", author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, env = "VALINOR_MAXSPEED_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand/tool to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive attributes and speed limits for every edge of the segments in a JSON file
    Infer {
        /// JSON array of segments (`id`, `tags`, optional `relations`, `edges` and `urban`)
        input: PathBuf,
    },
    /// Print the bit layout of the edge record
    Layout,
}

/// A way, as split into edges by the graph builder.
#[derive(Debug, Deserialize)]
struct SegmentInput {
    id: i64,
    #[serde(default)]
    tags: Tags,
    /// Tags of the relations the way is a member of
    #[serde(default)]
    relations: Vec<Tags>,
    #[serde(default = "default_edge_count")]
    edges: usize,
    /// Stand-in for a real urban density classification
    #[serde(default)]
    urban: bool,
}

fn default_edge_count() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct DirectionOutput {
    max_speed: DecimalValue,
    estimated: bool,
}

#[derive(Debug, Serialize)]
struct EdgeOutput {
    edge: EdgeId,
    way: i64,
    country: Country,
    state: State,
    road_class: RoadClass,
    surface: Surface,
    urban_density: UrbanDensity,
    lanes: DecimalValue,
    roundabout: bool,
    forward: DirectionOutput,
    backward: DirectionOutput,
}

#[derive(Debug, Serialize)]
struct InferOutput {
    stats: FillStats,
    edges: Vec<EdgeOutput>,
}

#[derive(Debug, Serialize)]
struct LayoutOutput<'a> {
    name: &'a str,
    kind: &'static str,
    offset: u32,
    width: u32,
    directional: bool,
}

fn infer(config: &Config, input: &Path) -> anyhow::Result<InferOutput> {
    let bytes = fs::read(input)
        .with_context(|| format!("Failed to read segments at {}", input.display()))?;
    let segments: Vec<SegmentInput> =
        serde_json::from_slice(&bytes).context("Invalid JSON in segment file")?;
    let edge_count: usize = segments.iter().map(|segment| segment.edges).sum();
    info!(segments = segments.len(), edges = edge_count, "Read segments");

    let lookup = config.legal_default_speeds()?;
    let (_, attributes) = EdgeAttributes::standard()?;
    let mut engine = LegalSpeedEngine::new(lookup, &attributes, edge_count)?;
    let mut store = EdgeRecordStore::new();

    // Pass 1
    let mut ways: Vec<(i64, Range<EdgeId>)> = Vec::with_capacity(segments.len());
    {
        let mut parsers = OsmParsers::standard(&attributes, engine.parser());
        for segment in segments {
            let edges = store.create_edges(segment.edges);
            let way = OsmWay::new(segment.id, segment.tags);
            let relations = RelationContext::new(segment.relations);
            parsers.handle_way(&mut store.segment_mut(edges.clone()), &way, &relations);

            let density = if segment.urban {
                UrbanDensity::Urban
            } else {
                UrbanDensity::Rural
            };
            store
                .segment_mut(edges.clone())
                .update(|_, record| attributes.urban_density.set(false, record, density));
            ways.push((segment.id, edges));
        }
    }

    // Pass 2
    let stats = engine.fill_max_speeds(&mut store);

    let mut edges = Vec::with_capacity(store.len());
    for (way, range) in ways {
        for edge in range {
            let Some(record) = store.get(edge) else {
                continue;
            };
            let direction = |reverse| DirectionOutput {
                max_speed: attributes.max_speed.get(reverse, record),
                estimated: attributes.max_speed_estimated.get(reverse, record),
            };
            edges.push(EdgeOutput {
                edge,
                way,
                country: attributes.country.get(false, record),
                state: attributes.state.get(false, record),
                road_class: attributes.road_class.get(false, record),
                surface: attributes.surface.get(false, record),
                urban_density: attributes.urban_density.get(false, record),
                lanes: attributes.lanes.get(false, record),
                roundabout: attributes.roundabout.get(false, record),
                forward: direction(false),
                backward: direction(true),
            });
        }
    }

    Ok(InferOutput { stats, edges })
}

fn layout(registry: &AttributeRegistry) -> Vec<LayoutOutput<'_>> {
    registry
        .attributes()
        .map(|attribute| {
            let range = attribute.slot().range(false);
            LayoutOutput {
                name: attribute.descriptor().name(),
                kind: match attribute.descriptor().kind() {
                    ValueKind::Boolean => "boolean",
                    ValueKind::Decimal(_) => "decimal",
                    ValueKind::Enumerated { .. } => "enum",
                },
                offset: range.offset(),
                width: range.width(),
                directional: attribute.slot().is_directional(),
            }
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        // Standard logger, configured via the RUST_LOG env variable
        .with(tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env()))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    config.init_thread_pool()?;

    match cli.command {
        Commands::Infer { input } => {
            let output = infer(&config, &input)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Layout => {
            let (registry, _) = EdgeAttributes::standard()?;
            info!(
                record_bits = registry.record_bits(),
                used_bits = registry.used_bits(),
                "Edge record layout"
            );
            println!("{}", serde_json::to_string_pretty(&layout(&registry))?);
        }
    }

    Ok(())
}
