pub mod memory;
pub mod pg;
pub mod queue;
pub mod traits;

pub use memory::MemoryBackend;
pub use pg::{PgBus, PgStore};
pub use queue::{Delivery, Queue};
pub use traits::{Bus, CategoryStats, Store};
