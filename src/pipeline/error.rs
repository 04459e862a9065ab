use crate::model::Mode;

/// Caller-contract violations. Everything per-candidate is absorbed into
/// rejection reasons instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Unknown mode '{0}' (expected one of: {modes})", modes = mode_list())]
    UnknownMode(String),

    #[error("Invalid duration: {0} minutes (must be at least 1)")]
    InvalidDuration(u32),
}

fn mode_list() -> String {
    Mode::ALL.map(Mode::as_str).join(", ")
}
