//! Pigment CLI - bookmark coloring for RDF graphs from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show graph statistics
//! pigment stats input.nt
//!
//! # Color every vertex and write co-occurrence triples
//! pigment color input.nt -o cooc.tsv --variant undirected-weighted --alpha 0.15
//!
//! # Inspect the context vector of one entity
//! pigment vector input.nt "http://example.org/Apple" --limit 10
//! ```
//!
//! Set `RUST_LOG` (or pass `-v`) for progress logs on stderr.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pigment_bca::{
    BcaConfig, BcaEngine, BookmarkSet, CoOccurrenceMatrix, DateDirection, Variant,
};
use pigment_core::formats::NTriples;
use pigment_core::{PredicateWeighting, RdfGraph, Term, VertexKind};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "pigment")]
#[command(version)]
#[command(about = "Bookmark coloring for RDF graph embeddings", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics about an RDF graph
    Stats {
        /// Input file (N-Triples format)
        input: PathBuf,
    },

    /// Color bookmarks and write co-occurrence triples
    Color {
        /// Input file (N-Triples format)
        input: PathBuf,

        /// Output file (`row<TAB>column<TAB>value` lines)
        #[arg(short, long)]
        output: PathBuf,

        /// Shuffle the triples with this seed before writing
        #[arg(long)]
        shuffle_seed: Option<u64>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Print the context vector of one term
    Vector {
        /// Input file (N-Triples format)
        input: PathBuf,

        /// Bookmark: an N-Triples term (`<iri>`, `_:b0`, `"v"^^<type>`), or a bare
        /// IRI or plain literal text
        term: String,

        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        #[command(flatten)]
        run: RunArgs,
    },
}

/// Run settings; flags override the JSON config file.
#[derive(Args)]
struct RunArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Neighbor policy (e.g. directed-weighted, kale-15x15)
    #[arg(long)]
    variant: Option<Variant>,

    /// Fraction of paint kept at each node
    #[arg(long)]
    alpha: Option<f64>,

    /// Paint below this is not forwarded
    #[arg(long)]
    epsilon: Option<f64>,

    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Follow edges backwards
    #[arg(long)]
    reverse: bool,

    /// Predicate weighting (none, manual, pagerank, frequency, inverse-frequency)
    #[arg(long)]
    weighting: Option<PredicateWeighting>,

    /// Give arrival predicates their own slots (directed-unweighted only)
    #[arg(long)]
    emit_predicates: bool,

    /// Also color predicate slots
    #[arg(long)]
    include_predicates: bool,

    /// Date winnowing: largest allowed distance in days
    #[arg(long)]
    max_days: Option<u32>,

    /// Date winnowing: allowed side of the anchor date
    #[arg(long)]
    date_direction: Option<DirectionArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    /// Candidate on or before the anchor
    Backwards,
    /// Candidate on or after the anchor
    Forwards,
    /// Either side
    Bidirectional,
}

impl From<DirectionArg> for DateDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Backwards => DateDirection::Backwards,
            DirectionArg::Forwards => DateDirection::Forwards,
            DirectionArg::Bidirectional => DateDirection::Bidirectional,
        }
    }
}

impl RunArgs {
    fn into_config(self) -> Result<BcaConfig> {
        let mut config = match &self.config {
            Some(path) => BcaConfig::from_json_file(path)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?,
            None => BcaConfig::default(),
        };

        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(weighting) = self.weighting {
            config.weighting = weighting;
        }
        config.reverse |= self.reverse;
        config.emit_predicates |= self.emit_predicates;
        config.include_predicates |= self.include_predicates;

        if self.max_days.is_some() || self.date_direction.is_some() {
            let mut filter = config.date_filter.unwrap_or_default();
            if let Some(days) = self.max_days {
                filter.max_days = Some(days);
            }
            if let Some(direction) = self.date_direction {
                filter.direction = direction.into();
            }
            config.date_filter = Some(filter);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Stats { input } => cmd_stats(&input),
        Commands::Color {
            input,
            output,
            shuffle_seed,
            run,
        } => cmd_color(&input, &output, shuffle_seed, run),
        Commands::Vector {
            input,
            term,
            limit,
            run,
        } => cmd_vector(&input, &term, limit, run),
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_graph(path: &Path) -> Result<RdfGraph> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut graph = RdfGraph::new();
    let report = NTriples::read_into(file, &mut graph)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if report.skipped > 0 {
        warn!(skipped = report.skipped, file = %path.display(), "skipped malformed lines");
    }
    info!(triples = report.triples, file = %path.display(), "graph loaded");
    Ok(graph)
}

fn cmd_stats(input: &Path) -> Result<()> {
    let graph = load_graph(input)?;
    let stats = graph.stats();

    println!("RDF Graph Statistics");
    println!("====================");
    println!("Vertices:       {}", stats.vertex_count);
    for kind in VertexKind::ALL {
        println!("  {:<13} {}", format!("{kind}:"), stats.kind_counts[usize::from(kind.ordinal())]);
    }
    println!("Edges:          {}", stats.edge_count);
    println!("Predicates:     {}", stats.predicate_count);
    println!("Avg out-degree: {:.2}", stats.avg_out_degree);

    Ok(())
}

fn cmd_color(input: &Path, output: &Path, shuffle_seed: Option<u64>, run: RunArgs) -> Result<()> {
    let config = run.into_config()?;
    let graph = load_graph(input)?;
    let engine = BcaEngine::new(config).context("Invalid configuration")?;

    let coloring = engine.run(&graph)?;
    for failure in coloring.failures().take(10) {
        eprintln!("failed: {failure}");
    }
    let failed = coloring.failure_count();
    if failed > 10 {
        eprintln!("... and {} more failures", failed - 10);
    }
    if !coloring.is_empty() && failed == coloring.len() {
        bail!("all {failed} diffusion jobs failed");
    }

    let mut matrix = CoOccurrenceMatrix::from_coloring(&graph, &coloring);
    if let Some(seed) = shuffle_seed {
        matrix.shuffle(seed);
    }
    let file = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    matrix
        .write_tsv(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Colored {} bookmarks ({} failed) with {}",
        coloring.len() - failed,
        failed,
        engine.config().variant
    );
    println!("Triples:        {}", matrix.len());
    println!("Vocabulary:     {}", matrix.vocabulary_size());
    println!("Max value:      {}", matrix.max_value());
    println!("Written to {}", output.display());
    Ok(())
}

fn cmd_vector(input: &Path, term: &str, limit: usize, run: RunArgs) -> Result<()> {
    let config = run.into_config()?;
    let graph = load_graph(input)?;
    let bookmark = resolve_term(&graph, term).with_context(|| format!("Term not found: {term}"))?;
    let engine = BcaEngine::new(config).context("Invalid configuration")?;

    let coloring = engine.run_with(&graph, &BookmarkSet::from_ids(vec![bookmark]))?;
    let Some(result) = coloring.into_results().into_iter().next() else {
        bail!("no vector produced for {term}");
    };
    let bcv = result?;

    let mut entries: Vec<(usize, f64)> = bcv.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let n = graph.vertex_count();
    println!("Context vector of {term} ({} entries):", entries.len());
    for (index, weight) in entries.iter().take(limit) {
        let (kind, label) = if *index < n {
            (
                graph.vertex_kind(*index).map_or_else(String::new, |k| k.to_string()),
                graph.vertex_label(*index).unwrap_or_default(),
            )
        } else {
            (
                "PREDICATE".to_string(),
                graph.predicate_label(index - n).unwrap_or_default(),
            )
        };
        println!("  {weight:.6}  {kind:<9}  {label}");
    }
    if entries.len() > limit {
        println!("  ... and {} more", entries.len() - limit);
    }
    Ok(())
}

/// N-Triples term syntax first; otherwise a bare IRI, then a plain literal.
fn resolve_term(graph: &RdfGraph, text: &str) -> Option<usize> {
    if let Ok(term) = Term::from_ntriples(text) {
        if let Some(id) = graph.vertex_id(&term) {
            return Some(id);
        }
    }
    graph
        .vertex_id(&Term::iri(text))
        .or_else(|| graph.vertex_id(&Term::literal(text)))
}
