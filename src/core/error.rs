use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown unit: {0:?}")]
    UnknownUnit(crate::core::types::UnitId),

    #[error("Unit is dead: {0:?}")]
    UnitDead(crate::core::types::UnitId),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Scenario error: {0}")]
    ScenarioError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
