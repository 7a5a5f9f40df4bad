pub mod fallback;
pub mod health;
pub mod op_data;

pub use fallback::unmatched_request;
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use op_data::{create_op_data, delete_op_data, get_op_data, list_op_data, update_op_data};
