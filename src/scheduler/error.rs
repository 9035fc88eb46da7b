use thiserror::Error;

/// Synchronous, caller-visible scheduler errors.
///
/// Failures of the end action itself are not here: no caller awaits the fire
/// sequence, so those surface as [`super::ActionFailure`] reports instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Schedule/reset reached the scheduler before an end action was bound.
    /// No timer is created.
    #[error("no end action bound; bind the close action during startup before scheduling")]
    NotBound,

    /// A second bind was attempted. The binding is fixed for the process's
    /// lifetime.
    #[error("end action is already bound")]
    AlreadyBound,

    /// Schedule/reset after shutdown.
    #[error("scheduler has been shut down")]
    ShutDown,
}
