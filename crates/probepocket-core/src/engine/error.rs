use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid atom at index {index}: {reason}")]
    InvalidAtom { index: usize, reason: &'static str },

    #[error("Accretion failed to converge after {iterations} passes")]
    Convergence { iterations: usize },
}
