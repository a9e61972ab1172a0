use thiserror::Error;

use crate::tsne::OptimizerError;

/// Errors surfaced by the driver and the shape registry.
///
/// Boundary evaluation and projection are total; only input handling and the
/// embedding optimiser can fail.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// No observations to embed.
    #[error("dataset has no observations")]
    EmptyInput,
    /// Shape name not present in the registry.
    #[error("unknown boundary shape `{0}` (expected one of: circle, heart)")]
    UnknownShape(String),
    /// The optimiser returned a layout of the wrong size.
    #[error("optimizer returned {got} points for {expected} observations")]
    LengthMismatch { expected: usize, got: usize },
    /// The optimiser failed; passed through unchanged.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}
