use bundlerepo_api::FingerprintIndex;
use bundlerepo_core::RepositoryConfig;
use bundlerepo_core::cache::FingerprintCache;
use clap::Subcommand;
use std::path::PathBuf;
use tabled::{Table, Tabled};

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats,
    /// List fingerprinted archives
    List {
        /// Sort by size or date
        #[arg(long, value_parser = ["size", "date"])]
        sort: Option<String>,
        /// Filter by path pattern
        #[arg(long)]
        filter: Option<String>,
    },
    /// Inspect a specific fingerprinted archive
    Inspect {
        /// Fingerprint hash (full or prefix)
        hash: String,
    },
    /// Clear the cache
    Clear,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Hash")]
    hash: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Bundle")]
    symbolic_name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Modified")]
    age: String,
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

fn format_age(mtime_millis: u64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let age = now.saturating_sub(mtime_millis / 1000);
    if age < 60 {
        format!("{}s ago", age)
    } else if age < 3600 {
        format!("{}m ago", age / 60)
    } else if age < 86400 {
        format!("{}h ago", age / 3600)
    } else {
        format!("{}d ago", age / 86400)
    }
}

pub fn run(
    cache_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    cmd: CacheCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => RepositoryConfig::from_file(&path)?,
        None => RepositoryConfig::default(),
    };
    let dir = cache_dir
        .or(config.cache_dir)
        .unwrap_or_else(RepositoryConfig::default_cache_dir);

    // The cache is a plain file; no repository is needed to manage it
    let mut cache = FingerprintCache::load_from_disk(&dir, config.cache_format);

    match cmd {
        CacheCommands::Stats => {
            let stats = cache.stats();
            println!("Cache Directory: {}", dir.display());
            if let Some(file) = &stats.cache_file {
                println!("Cache File:      {}", file.display());
            }
            println!("Total Entries:   {}", stats.total_entries);
        }
        CacheCommands::List { sort, filter } => {
            let mut entries = cache.entries();

            if let Some(pattern) = filter {
                entries.retain(|e| e.path.contains(&pattern));
            }

            if let Some(key) = sort {
                match key.as_str() {
                    "size" => entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes)),
                    "date" => entries.sort_by(|a, b| b.mtime_millis.cmp(&a.mtime_millis)),
                    _ => {}
                }
            }

            let rows: Vec<EntryRow> = entries
                .into_iter()
                .map(|e| EntryRow {
                    hash: e.hash,
                    path: e.path,
                    size: format_size(e.size_bytes),
                    symbolic_name: e.symbolic_name,
                    version: e.version,
                    age: format_age(e.mtime_millis),
                })
                .collect();

            if rows.is_empty() {
                println!("No fingerprinted archives found.");
            } else {
                println!("{}", Table::new(rows));
            }
        }
        CacheCommands::Inspect { hash } => {
            if let Some(entry) = cache.find_by_hash_prefix(&hash) {
                println!("Entry Summary:");
                println!("  Path:     {}", entry.path);
                println!("  Hash:     {}", entry.hash);
                println!("  Size:     {}", format_size(entry.size_bytes));
                println!("  Modified: {}", format_age(entry.mtime_millis));
                println!("  Bundle:   {}", entry.symbolic_name);
                println!("  Version:  {}", entry.version);
            } else {
                println!("Entry not found with hash prefix: {}", hash);
            }
        }
        CacheCommands::Clear => {
            cache.clear()?;
            println!("Cache cleared successfully.");
        }
    }

    Ok(())
}
