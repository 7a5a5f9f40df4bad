//! service-core: shared infrastructure for the OpData service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

