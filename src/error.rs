use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WtnError {
    #[error("Browser command error: {0}")]
    Browser(#[from] fantoccini::error::CmdError),
    #[error("Browser session error: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Required input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WtnError>;
