pub mod op_data;

pub use op_data::{OpData, OpDataPatch};
