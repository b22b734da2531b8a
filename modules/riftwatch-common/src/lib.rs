pub mod audit_log;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod telemetry;
pub mod types;

pub use audit_log::{AuditEntry, BoundedAuditLog};
pub use config::Config;
pub use error::{Result, RiftwatchError};
pub use fingerprint::fingerprint;
pub use telemetry::init_tracing;
pub use types::*;
