use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single processing resource. Can run at most one step at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Stable unique identifier, e.g. `"M2"`.
    pub id: String,
    /// Display label.
    pub name: String,
}

/// One unit of work a job performs on one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub machine_id: String,
    /// Whole hours, at least 1.
    pub duration_hours: u64,
}

/// A job with its fixed routing through the factory.
///
/// Step order is significant: step `k` must complete before step `k + 1`
/// may begin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    /// The hour by which the job should ideally finish.
    pub due_time_hour: u64,
    pub steps: Vec<Step>,
}

impl Job {
    /// Sum of all step durations, a lower bound on this job's completion.
    pub fn total_work_hours(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_hours).sum()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({}, due@{}, {} steps)", self.id, self.due_time_hour, self.steps.len())
    }
}

/// The validated, static description of the factory.
///
/// This is the sole input to the what-if core. Scenarios never mutate it;
/// they derive an effective copy via [`crate::scenarios::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    pub machines: Vec<Machine>,
    pub jobs: Vec<Job>,
}

impl FactoryConfig {
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Onboarding-boundary validation.
    ///
    /// Everything downstream of this call assumes these invariants hold:
    /// unique machine and job ids, every job has at least one step, every
    /// step references an existing machine, every duration is at least one
    /// hour. The core only repeats the cheap subset of these checks as
    /// fail-fast assertions.
    pub fn validate(&self) -> Result<(), FactoryError> {
        let mut machine_ids = HashSet::new();
        for machine in &self.machines {
            if !machine_ids.insert(machine.id.as_str()) {
                return Err(FactoryError::DuplicateMachineId { id: machine.id.clone() });
            }
        }

        let mut job_ids = HashSet::new();
        for job in &self.jobs {
            if !job_ids.insert(job.id.as_str()) {
                return Err(FactoryError::DuplicateJobId { id: job.id.clone() });
            }
            if job.steps.is_empty() {
                return Err(FactoryError::EmptyRouting { job_id: job.id.clone() });
            }
            for step in &job.steps {
                if !machine_ids.contains(step.machine_id.as_str()) {
                    return Err(FactoryError::UnknownMachine {
                        job_id: job.id.clone(),
                        machine_id: step.machine_id.clone(),
                    });
                }
                if step.duration_hours == 0 {
                    return Err(FactoryError::ZeroDuration {
                        job_id: job.id.clone(),
                        machine_id: step.machine_id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Rejections at the onboarding boundary, before anything reaches the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    #[error("duplicate machine id `{id}`")]
    DuplicateMachineId { id: String },
    #[error("duplicate job id `{id}`")]
    DuplicateJobId { id: String },
    #[error("job `{job_id}` has no steps")]
    EmptyRouting { job_id: String },
    #[error("job `{job_id}` references unknown machine `{machine_id}`")]
    UnknownMachine { job_id: String, machine_id: String },
    #[error("job `{job_id}` has a zero-duration step on machine `{machine_id}`")]
    ZeroDuration { job_id: String, machine_id: String },
}
