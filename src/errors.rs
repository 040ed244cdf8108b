use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Everything that can go wrong in a simulation session. Neither variant is
/// fatal: a busy runway is logged by the tower and retried on a later tick,
/// and a malformed velocity is reported at the console without registering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("runway {0} is occupied")]
    RunwayBusy(u32),

    #[error("invalid velocity {0:?}: expected 3 comma-separated numbers")]
    InvalidVelocity(String),
}
