mod cache;
mod inspect;
mod select;

use cache::CacheCommands;
use clap::{Parser, Subcommand};
use select::SelectArgs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "bundlerepo",
    version,
    about = "Resolve OSGi bundles from a local install directory",
    long_about = "bundlerepo picks the archive to load for a bundle symbolic name and version range \
                  from the jars installed under a base directory, applying iFix precedence. \
                  Archive identities read from manifests are memoized in a fingerprint cache."
)]
pub struct Cli {
    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the bundle to load for a symbolic name and version range
    #[command(
        long_about = "Scans the location (relative to --base) for archives of the named bundle and \
                            prints the one to load. Exits with a failure status when nothing matches."
    )]
    Select(SelectArgs),
    /// Show the identity of an archive, by file name and by manifest
    Inspect {
        /// Path to the archive
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },
    /// Manage the fingerprint cache
    Cache {
        /// Cache directory (defaults to $BUNDLEREPO_CACHE_DIR or ~/.bundlerepo/cache)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// JSON repository config providing the cache directory and format
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: CacheCommands,
    },
}

pub fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = bundlerepo_core::logging::init_logging("cli", cli.verbose);

    match cli.command {
        Commands::Select(args) => select::run(args),
        Commands::Inspect { archive } => {
            inspect::run(&archive)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Cache {
            cache_dir,
            config,
            command,
        } => {
            cache::run(cache_dir, config, command)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
