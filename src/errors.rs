use crate::config::ConfigError;
use crate::render::sink::SinkError;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Element '{code}' is already registered in scene '{scene}'")]
    DuplicateElement { scene: String, code: String },

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
