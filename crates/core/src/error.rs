use thiserror::Error;

use crate::game::TeamId;

/// Errors raised by the model and backtest core.
///
/// The variants carry different propagation policies: `Data` aborts a whole
/// run, `TeamNotFound` aborts one evaluation step, and
/// `ExternalDataUnavailable` only zeroes a single adjustment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Malformed or unordered input.
    #[error("data error: {0}")]
    Data(String),

    /// Queried team has no games in the current training snapshot.
    #[error("team not found in training data: {0}")]
    TeamNotFound(TeamId),

    /// Optional adjustment context is missing.
    #[error("external data unavailable: {0}")]
    ExternalDataUnavailable(String),
}

impl ModelError {
    /// Returns true if this error invalidates the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}
