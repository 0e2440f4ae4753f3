pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod models;
pub mod processor;
pub mod reference;
pub mod server;
pub mod summary;
pub mod window;

// Re-export the main entry points for convenience
pub use config::SummaryConfig;
pub use engine::SummaryEngine;
pub use server::create_router;
