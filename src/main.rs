use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use graph::{Commit, DotType, GitWalker, GraphLayoutEngine, LayoutOptions};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "gitgraph")]
#[command(about = "Lay out the commit graph column of a Git history", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the graph layout as JSON
    Layout {
        #[command(flatten)]
        source: SourceArgs,
        /// Read commits from a JSON file instead of a repository
        #[arg(long)]
        input: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show a summary of the graph layout
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to the repository
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Number of commits to lay out
    #[arg(short, long)]
    limit: Option<usize>,
    /// Follow first parents only
    #[arg(long)]
    first_parent: bool,
    /// Layout options file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    fn options(&self) -> Result<LayoutOptions> {
        let options = match &self.config {
            Some(path) => LayoutOptions::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => LayoutOptions::default(),
        };

        if self.first_parent {
            Ok(options.with_first_parent_only(true))
        } else {
            Ok(options)
        }
    }

    fn history(&self, options: &LayoutOptions) -> Result<Vec<Commit>> {
        let path = self
            .path
            .to_str()
            .context("Repository path is not valid UTF-8")?;
        let walker = GitWalker::new(Some(path))?;
        walker.history(self.limit, options.first_parent_only)
    }
}

fn read_commits(path: &Path, limit: Option<usize>) -> Result<Vec<Commit>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut commits: Vec<Commit> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse commits from {}", path.display()))?;

    if let Some(limit) = limit {
        commits.truncate(limit);
    }
    Ok(commits)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Layout {
            source,
            input,
            pretty,
        } => {
            let options = source.options()?;
            let commits = match &input {
                Some(file) => read_commits(file, source.limit)?,
                None => source.history(&options)?,
            };
            info!(commits = commits.len(), "laying out history");

            let output = GraphLayoutEngine::new(options).layout(&commits);
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
        Commands::Stats { source } => {
            let options = source.options()?;
            let commits = source.history(&options)?;
            let output = GraphLayoutEngine::new(options).layout(&commits);
            let graph = &output.graph;

            let merges = graph
                .dots
                .iter()
                .filter(|d| d.kind == DotType::Merge)
                .count();
            let merged_rows = output.rows.iter().filter(|r| r.is_merged).count();
            let widest = output.rows.iter().map(|r| r.margin).fold(0.0, f64::max);

            println!("Graph layout for {}:", source.path.display());
            println!("  Commits:      {}", commits.len());
            println!("  Merge rows:   {}", merges);
            println!("  Merged rows:  {}", merged_rows);
            println!("  Paths:        {}", graph.paths.len());
            println!("  Links:        {}", graph.links.len());
            println!("  Widest row:   {:.1}", widest);
        }
    }

    Ok(())
}
