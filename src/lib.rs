pub mod cli;
pub mod error;
pub mod generator;
pub mod io;
pub mod options;
pub mod package_json;
pub mod package_manager;
pub mod plan;
pub mod prompt;
pub mod runner;
pub mod template;

pub use error::{Result, ScaffoldError};
pub use generator::{Generator, RunSummary};
