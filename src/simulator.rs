use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::errors::{WhatIfError, WhatIfResult};
use crate::factory::{FactoryConfig, Job};
use crate::utils::logging::prelude::*;

/// One scheduled step: job `job_id` occupies `machine_id` for
/// `[start_hour, end_hour)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepAssignment {
    pub job_id: String,
    pub step_index: usize,
    pub machine_id: String,
    pub start_hour: u64,
    pub end_hour: u64,
}

/// A computed schedule for one effective factory.
///
/// Produced fresh per scenario and discarded once its metrics are derived;
/// nothing here is shared across scenarios or requests.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    assignments: Vec<StepAssignment>,
    machine_busy: BTreeMap<String, u64>,
}

impl Schedule {
    pub fn assignments(&self) -> &[StepAssignment] {
        &self.assignments
    }

    /// Maximum end hour over all recorded steps, 0 for an empty schedule.
    pub fn makespan_hour(&self) -> u64 {
        self.assignments.iter().map(|a| a.end_hour).max().unwrap_or(0)
    }

    /// End hour of the job's last step, `None` if the job never ran.
    pub fn job_completion_hour(&self, job_id: &str) -> Option<u64> {
        self.assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| a.end_hour)
            .max()
    }

    /// Cumulative hours the machine spent executing steps.
    pub fn busy_hours(&self, machine_id: &str) -> u64 {
        self.machine_busy.get(machine_id).copied().unwrap_or(0)
    }

    fn record(&mut self, assignment: StepAssignment) {
        let duration = assignment.end_hour - assignment.start_hour;
        *self.machine_busy.entry(assignment.machine_id.clone()).or_insert(0) += duration;
        self.assignments.push(assignment);
    }
}

/// Tracks one job's progress through its routing.
struct JobCursor<'f> {
    job: &'f Job,
    next_step: usize,
    ready_hour: u64,
}

impl<'f> JobCursor<'f> {
    fn is_done(&self) -> bool {
        self.next_step >= self.job.steps.len()
    }
}

/// Computes a deterministic, non-preemptive, single-capacity-per-machine
/// schedule for the effective factory.
///
/// All jobs are released at hour 0. The loop is event-driven: a future-event
/// queue holds every hour at which a job becomes ready or a machine becomes
/// free, and at each popped hour every free machine (ascending machine id)
/// takes the waiting ready job with the lowest `(job id, step index)`.
/// Machines never idle while a ready job is waiting for them.
#[instrument(level = "debug", skip_all, fields(jobs = factory.jobs.len(), machines = factory.machines.len()))]
pub fn simulate(factory: &FactoryConfig) -> WhatIfResult<Schedule> {
    // Fail-fast defensive checks. The onboarding boundary repairs or rejects
    // these long before this point; hitting one here is a contract bug.
    for job in &factory.jobs {
        for (idx, step) in job.steps.iter().enumerate() {
            if step.duration_hours == 0 {
                return Err(WhatIfError::invalid_input(format!(
                    "job `{}` step {} has zero duration",
                    job.id, idx
                )));
            }
            if factory.machine(&step.machine_id).is_none() {
                return Err(WhatIfError::invalid_input(format!(
                    "job `{}` step {} references unknown machine `{}`",
                    job.id, idx, step.machine_id
                )));
            }
        }
    }

    let mut schedule = Schedule::default();

    // Cursors in ascending job id order; each job exposes at most one ready
    // step at a time, so this ordering is the whole tie-break.
    let mut cursors: Vec<JobCursor<'_>> = factory
        .jobs
        .iter()
        .map(|job| JobCursor { job, next_step: 0, ready_hour: 0 })
        .collect();
    cursors.sort_by(|a, b| a.job.id.cmp(&b.job.id));

    let mut machine_ids: Vec<&str> = factory.machines.iter().map(|m| m.id.as_str()).collect();
    machine_ids.sort_unstable();
    let mut machine_free: BTreeMap<&str, u64> = machine_ids.iter().map(|&id| (id, 0)).collect();

    let mut remaining: usize = factory.jobs.iter().map(|j| j.steps.len()).sum();
    let mut events: BinaryHeap<Reverse<u64>> = BinaryHeap::new();
    events.push(Reverse(0));

    while remaining > 0 {
        let now = match events.pop() {
            Some(Reverse(hour)) => hour,
            // Every assignment pushes its end hour, so the queue can only
            // drain once all steps are placed.
            None => {
                return Err(WhatIfError::invalid_input(
                    "event queue drained before all steps completed".to_string(),
                ))
            }
        };
        // collapse duplicate event hours
        while let Some(&Reverse(next)) = events.peek() {
            if next != now {
                break;
            }
            events.pop();
        }
        trace!(hour = now, remaining, "advance to event");

        for &machine_id in &machine_ids {
            if machine_free[machine_id] > now {
                continue;
            }
            // lowest job id first; cursors are kept in that order
            let candidate = cursors.iter_mut().find(|c| {
                !c.is_done() && c.ready_hour <= now && c.job.steps[c.next_step].machine_id == machine_id
            });
            if let Some(cursor) = candidate {
                let step = &cursor.job.steps[cursor.next_step];
                let end = now + step.duration_hours;
                debug!(
                    hour = now,
                    machine = machine_id,
                    job = %cursor.job.id,
                    step = cursor.next_step,
                    end,
                    "assign step"
                );
                schedule.record(StepAssignment {
                    job_id: cursor.job.id.clone(),
                    step_index: cursor.next_step,
                    machine_id: machine_id.to_string(),
                    start_hour: now,
                    end_hour: end,
                });
                machine_free.insert(machine_id, end);
                cursor.ready_hour = end;
                cursor.next_step += 1;
                remaining -= 1;
                events.push(Reverse(end));
            }
        }
    }

    Ok(schedule)
}
