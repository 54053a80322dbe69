use thiserror::Error;

use crate::compliance::providers::ProviderError;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Resource provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown target '{0}' (expected one of: k8s, docker, files, all)")]
    UnknownTarget(String),

    #[error("Unknown output format '{0}' (expected one of: table, json, junit, html)")]
    UnknownFormat(String),

    #[error("Invalid severity '{0}' (expected one of: low, medium, high, critical)")]
    InvalidSeverity(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to parse config file: {0}")]
    ParsingFailed(String),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
