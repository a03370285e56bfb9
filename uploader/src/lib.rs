pub mod config;
pub mod constants;
pub mod errors;
pub mod exchange;
pub mod runner;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigManager};
pub use errors::{ExchangeError, TransportError};
pub use exchange::{Credentials, ExchangeClient, FileJob, Session, TransferPolicy};
pub use runner::{ExchangeRunner, RunContext, RunReport, RunState};
