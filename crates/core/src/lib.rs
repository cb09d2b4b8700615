pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod naming;
pub mod repository;
pub mod scan;
pub mod select;

pub use config::RepositoryConfig;
pub use error::{CacheError, RepositoryError, Result};
pub use repository::{LocalBundleRepository, RepositoryStats, SelectionReport};
pub use select::{BundleSelector, Selection};
