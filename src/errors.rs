use thiserror::Error;

/// Failures raised by the what-if core itself.
///
/// All of these are synchronous and abort the scenario (and, at the CLI
/// orchestration layer, the whole request). The core never substitutes a
/// default value to paper over one of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WhatIfError {
    /// A scenario names a rush job that does not exist in the factory.
    #[error("scenario references unknown job `{job_id}`")]
    UnknownJob { job_id: String },
    /// A data-model invariant was violated by the time it reached the
    /// simulator. The onboarding boundary should have rejected this input,
    /// so this is a contract error, not a user error.
    #[error("invalid schedule input: {reason}")]
    InvalidScheduleInput { reason: String },
    /// Metrics were requested for a factory with zero machines.
    #[error("cannot derive metrics for a factory with no machines")]
    NoMachines,
}

pub type WhatIfResult<T> = std::result::Result<T, WhatIfError>;

impl WhatIfError {
    pub fn unknown_job(job_id: impl Into<String>) -> Self {
        Self::UnknownJob { job_id: job_id.into() }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidScheduleInput { reason: reason.into() }
    }
}
