pub mod middleware;
pub mod state;
pub mod tracing;
