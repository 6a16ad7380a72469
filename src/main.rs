use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use opwalk::config::WalkerConfig;
use opwalk::diagnostics::{self, WalkError};
use opwalk::ir;
use opwalk::pretty;
use opwalk::visit::composers::TreeStats;

#[derive(Parser)]
#[command(name = "opwalk", version, about = "Walk semantic operation trees")]
struct Cli {
    /// Config file (defaults to the nearest opwalk.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum operation nesting depth before the walk is aborted
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    max_depth: Option<u32>,

    /// Source text the tree was lowered from, used to render error locations
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pre-order dispatch sequence of a JSON operation tree
    Walk {
        /// Operation tree (.json)
        file: PathBuf,
    },
    /// Summarize the shape of a JSON operation tree
    Stats {
        /// Operation tree (.json)
        file: PathBuf,
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print an outline of a JSON operation tree with payloads and spans
    Outline {
        /// Operation tree (.json)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            let source = cli
                .source
                .as_ref()
                .and_then(|path| std::fs::read_to_string(path).ok());
            let filename = cli
                .source
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<source>".to_string());
            diagnostics::render_error(source.as_deref(), &filename, &err);
            std::process::exit(if err.is_stack_exhaustion() { 2 } else { 1 });
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> Result<String, WalkError> {
    let config = resolve_config(cli.config.as_deref(), cli.max_depth)?;
    tracing::debug!(max_depth = config.max_depth, "walker config resolved");

    match &cli.command {
        Commands::Walk { file } => {
            let tree = ir::load_tree(file)?;
            pretty::trace(&tree, config.max_depth)
        }
        Commands::Outline { file } => {
            let tree = ir::load_tree(file)?;
            pretty::outline(&tree, config.max_depth)
        }
        Commands::Stats { file, json } => {
            let tree = ir::load_tree(file)?;
            let stats = TreeStats::gather(&tree, config.max_depth)?;
            if *json {
                let mut out = serde_json::to_string_pretty(&stats)
                    .map_err(|e| WalkError::load(format!("cannot encode stats: {e}"), file.clone()))?;
                out.push('\n');
                Ok(out)
            } else {
                Ok(format_stats(&stats))
            }
        }
    }
}

fn resolve_config(path: Option<&Path>, max_depth: Option<u32>) -> Result<WalkerConfig, WalkError> {
    let mut config = match path {
        Some(path) => WalkerConfig::load(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(|e| {
                WalkError::config(format!("cannot determine current directory: {e}"), PathBuf::from("."))
            })?;
            WalkerConfig::discover(&cwd)?
        }
    };
    if let Some(max_depth) = max_depth {
        config.max_depth = max_depth;
    }
    Ok(config)
}

fn format_stats(stats: &TreeStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("nodes: {}\n", stats.nodes));
    out.push_str(&format!("max depth: {}\n", stats.max_depth));
    out.push_str(&format!("placeholders: {}\n", stats.placeholders));
    out.push_str("kinds:\n");
    for (kind, count) in &stats.kinds {
        out.push_str(&format!("  {kind}: {count}\n"));
    }
    out
}
