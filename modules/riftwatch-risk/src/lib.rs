pub mod poller;
pub mod scoring;
pub mod simulator;
pub mod surge;

pub use poller::run_risk_loop;
pub use scoring::{score_event, score_event_dynamic, ScoringThresholds};
pub use simulator::simulate;
pub use surge::{SurgeObservation, SurgeTracker};
