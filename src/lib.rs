pub mod config;
pub mod discover;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod schema;

pub use config::Config;
pub use error::{MergeError, Result};
pub use pipeline::{run, RunSummary};
