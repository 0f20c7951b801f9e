pub mod config;
pub mod output;
pub mod pipeline;
pub mod report;

pub use config::{ConfigError, Settings};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError};
pub use report::Report;
