// Command-line entry point for calltree.

use anyhow::{Context, Result};
use calltree::application::AnalyzeUsecase;
use calltree::infrastructure::logger::init_logger;
use calltree::infrastructure::{CalltreeConfig, LoadedProfile, ProfileLoader, DEFAULT_CONFIG_FILE};
use calltree::ports::DotExporter;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the call graph as Graphviz DOT
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Emit call labels and edge metrics as edge attributes
        #[arg(long)]
        rich_edge_labels: bool,
    },
    /// Write call depths for every connected pair as JSON
    Depths {
        #[command(flatten)]
        input: InputArgs,

        /// Compute per-source passes on a thread pool
        #[arg(long)]
        parallel: bool,

        /// Worker count for --parallel (0 = half of the cores)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Profile description (JSON)
    #[arg(short, long)]
    profile: PathBuf,

    /// Per-call weights (JSON object of call id -> weight)
    #[arg(short, long)]
    weights: Option<PathBuf>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

impl InputArgs {
    fn load(&self) -> Result<(CalltreeConfig, LoadedProfile)> {
        let config = CalltreeConfig::load(&self.config)?;
        let mut loaded = ProfileLoader::load_path(&self.profile)?;
        if let Some(weights) = &self.weights {
            loaded.apply_weights_path(weights)?;
        }
        Ok((config, loaded))
    }

    fn sink(&self) -> Result<Box<dyn Write>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Cannot create output file {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(io::stdout().lock())),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Export { input, rich_edge_labels } => {
            let (mut config, loaded) = input.load()?;
            config.export.rich_edge_labels |= rich_edge_labels;

            let exporter = DotExporter::new(config.export);
            let usecase = AnalyzeUsecase { exporter: &exporter, depth: config.depth };
            let mut sink = input.sink()?;
            usecase.export(&loaded.graph, &mut sink)?;
            report(input.output.as_deref(), "DOT");
        }
        Command::Depths { input, parallel, jobs } => {
            let (mut config, loaded) = input.load()?;
            config.depth.parallel |= parallel;
            if let Some(jobs) = jobs {
                config.depth.jobs = jobs;
            }

            let exporter = DotExporter::new(config.export);
            let usecase = AnalyzeUsecase { exporter: &exporter, depth: config.depth };
            let mut sink = input.sink()?;
            usecase.write_depths(&loaded.graph, &mut sink)?;
            sink.flush()?;
            report(input.output.as_deref(), "call depths");
        }
    }
    Ok(())
}

fn report(output: Option<&Path>, what: &str) {
    if let Some(path) = output {
        info!("{} written to {}", what, path.display());
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
