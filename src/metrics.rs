use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{WhatIfError, WhatIfResult};
use crate::factory::FactoryConfig;
use crate::simulator::Schedule;

/// Comparable performance numbers for one evaluated scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioMetrics {
    /// Completion hour of the last step, 0 for an empty schedule.
    pub makespan_hour: u64,
    /// `max(0, completion - due)` per job; exactly one entry per job in the
    /// effective factory, on-time jobs included with value 0.
    pub job_lateness: BTreeMap<String, u64>,
    /// Machine with the most busy hours, ties broken by ascending id.
    pub bottleneck_machine_id: String,
    /// Busy hours of the bottleneck over the makespan, in `[0.0, 1.0]`.
    /// Defined as 0.0 when the makespan is 0.
    pub bottleneck_utilization: f64,
}

/// Reduces a schedule to its [`ScenarioMetrics`].
///
/// Pure over its inputs. Fails with [`WhatIfError::NoMachines`] if the
/// factory has no machines; a bottleneck cannot be named then, and the core
/// never substitutes a placeholder to mask that.
pub fn derive(schedule: &Schedule, factory: &FactoryConfig) -> WhatIfResult<ScenarioMetrics> {
    if factory.machines.is_empty() {
        return Err(WhatIfError::NoMachines);
    }

    let makespan_hour = schedule.makespan_hour();

    let job_lateness = factory
        .jobs
        .iter()
        .map(|job| {
            let completion = schedule.job_completion_hour(&job.id).unwrap_or(0);
            (job.id.clone(), completion.saturating_sub(job.due_time_hour))
        })
        .collect();

    // ascending id order makes the strict `>` comparison the tie-break
    let mut machine_ids: Vec<&str> = factory.machines.iter().map(|m| m.id.as_str()).collect();
    machine_ids.sort_unstable();
    let mut bottleneck = (machine_ids[0], schedule.busy_hours(machine_ids[0]));
    for &id in &machine_ids[1..] {
        let busy = schedule.busy_hours(id);
        if busy > bottleneck.1 {
            bottleneck = (id, busy);
        }
    }

    let bottleneck_utilization = if makespan_hour == 0 {
        0.0
    } else {
        bottleneck.1 as f64 / makespan_hour as f64
    };

    Ok(ScenarioMetrics {
        makespan_hour,
        job_lateness,
        bottleneck_machine_id: bottleneck.0.to_string(),
        bottleneck_utilization,
    })
}
