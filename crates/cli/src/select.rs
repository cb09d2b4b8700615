use bundlerepo_core::{LocalBundleRepository, RepositoryConfig};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Args)]
pub struct SelectArgs {
    /// Directory location specs are resolved against (defaults to the config's, then ".")
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Comma-separated directories, or one archive path; empty scans lib/
    #[arg(long, default_value = "")]
    pub location: String,

    /// Print the full selection report as JSON
    #[arg(long)]
    pub json: bool,

    /// Neither read nor write the fingerprint cache
    #[arg(long)]
    pub no_cache: bool,

    /// Fingerprint cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// JSON repository config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bundle symbolic name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Version range, e.g. "[1.0.0,2.0.0)" or "1.0"
    #[arg(value_name = "RANGE")]
    pub range: String,
}

pub fn build_config(args: &SelectArgs) -> Result<RepositoryConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => RepositoryConfig::from_file(path)?,
        None => RepositoryConfig::default(),
    };

    if let Some(base) = &args.base {
        config.base_dir = base.clone();
    }
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = Some(dir.clone());
    } else if config.cache_dir.is_none() {
        config.cache_dir = Some(RepositoryConfig::default_cache_dir());
    }
    if args.no_cache {
        config.cache_enabled = false;
    }

    Ok(config)
}

pub fn run(args: SelectArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let mut repo = LocalBundleRepository::from_config(config)?;

    let report = repo.select_bundle_detailed(&args.location, &args.name, &args.range)?;
    let stats = repo.stats();
    repo.dispose();

    info!(
        "Selection for {} {}: {} inspections, {} cache hits",
        args.name, args.range, stats.inspections, stats.cache_hits
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for diagnostic in &report.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
        match &report.selected {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("no match for {} {}", args.name, args.range),
        }
    }

    Ok(if report.selected.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
