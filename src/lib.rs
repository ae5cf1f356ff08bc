pub mod cli;
pub mod config;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod search;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use generator::workflow::{WorkflowRequest, launch, run};
pub use session::WorkflowSession;
