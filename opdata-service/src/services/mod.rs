pub mod database;
pub mod memory;
pub mod metrics;
pub mod op_data;
pub mod store;

pub use database::OpDataDb;
pub use memory::InMemoryStore;
pub use metrics::{get_metrics, init_metrics};
pub use op_data::OpDataService;
pub use store::{OpDataStore, UpdateOutcome};
