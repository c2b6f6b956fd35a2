use clap::{Parser, Subcommand, ValueHint};
use nodelinks::{
    match_accessions, parse_reference_tree, parse_reference_trees,
    relationships,
};
use rustc_hash::FxHashSet;
use std::error::Error;
use std::fs::read_to_string;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Newick reference tree normalizer and node relationship extractor
#[derive(Parser, Debug)]
#[command(name = "nodelinks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the normalized form of a tree
    Normalize {
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
    },

    /// Print the children and parents of every internal node
    Relationships {
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// Treat the file as already normalized
        #[arg(long)]
        normalized: bool,

        /// Also print the leaf labels below every internal node
        #[arg(long)]
        subtrees: bool,
    },

    /// Print relationships for many tree files, processed in parallel
    Batch {
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        trees: Vec<PathBuf>,
    },

    /// Look up accessions in a tab-separated accession/version/taxid table
    Accessions {
        #[arg(value_hint = ValueHint::FilePath)]
        table: PathBuf,

        /// Accessions to look up
        ids: Vec<String>,

        /// File with one accession per line
        #[arg(long, value_hint = ValueHint::FilePath)]
        ids_file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(err) = execute_command(&cli) {
        eprintln!("Error: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  Caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn execute_command(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Commands::Normalize { tree } => {
            println!("{}", parse_reference_tree(tree)?);
        }
        Commands::Relationships { tree, normalized, subtrees } => {
            let tree_text = if *normalized {
                read_to_string(tree)?
            } else {
                parse_reference_tree(tree)?
            };
            let rels = relationships(&tree_text)?;
            print!("{rels}");
            if *subtrees {
                print!("{}", rels.subtrees());
            }
        }
        Commands::Batch { trees } => {
            for (path, result) in trees.iter().zip(parse_reference_trees(trees)) {
                println!("# {}", path.display());
                match result {
                    Ok(rels) => print!("{rels}"),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), "{err}");
                        println!("# error: {err}");
                    }
                }
            }
        }
        Commands::Accessions { table, ids, ids_file } => {
            let mut requested: FxHashSet<String> = ids.iter().cloned().collect();
            if let Some(ids_file) = ids_file {
                requested.extend(
                    read_to_string(ids_file)?
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(String::from),
                );
            }
            let matches = match_accessions(&requested, table)?;
            for (id, version, taxid) in matches.iter() {
                println!("{id}\t{version}\t{taxid}");
            }
            if matches.len() < requested.len() {
                tracing::info!(
                    missing = requested.len() - matches.len(),
                    "some accessions were not found"
                );
            }
        }
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
