//! Error types for the junction signal engine.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while validating, simulating or exporting a run.
#[derive(Debug, Error)]
pub enum SimError {
    /// A lane rate is negative, infinite or NaN.
    #[error("invalid arrival rate {rate} on lane {lane}{}", of_junction(.junction))]
    InvalidRate {
        junction: Option<usize>,
        lane: usize,
        rate: f64,
    },

    /// A junction was configured without any lanes.
    #[error("junction has no lanes{}", of_junction(.junction))]
    InvalidTopology { junction: Option<usize> },

    /// A run configuration could not be read or parsed.
    #[error("invalid run configuration: {0}")]
    Config(String),

    /// A concurrent junction worker panicked or was cancelled.
    #[error("junction worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Attaches a junction index to an error raised by a bare sampler or arbitrator.
    pub fn at_junction(self, id: usize) -> Self {
        match self {
            SimError::InvalidRate { lane, rate, .. } => SimError::InvalidRate {
                junction: Some(id),
                lane,
                rate,
            },
            SimError::InvalidTopology { .. } => SimError::InvalidTopology { junction: Some(id) },
            other => other,
        }
    }
}

fn of_junction(junction: &Option<usize>) -> String {
    match junction {
        Some(id) => format!(" (junction {})", id),
        None => String::new(),
    }
}
