pub mod categorization;
pub mod circuit_breaker;
pub mod extraction;
pub mod fallback;
pub mod poller;
pub mod prompts;
pub mod resilient;

pub use poller::{run_categorization_loop, run_extraction_loop};
pub use resilient::Resilient;
