pub mod cycle;
pub mod dedup;
pub mod fetch;
pub mod normalize;
pub mod rss;
pub mod scheduler;
pub mod source;
pub mod web;

pub use cycle::{run_cycle, CycleSummary};
pub use fetch::Fetcher;
pub use scheduler::IngestScheduler;
pub use source::{load_sources, Source, SourceConfig, SourceKind};
