use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{WhatIfError, WhatIfResult};
use crate::factory::FactoryConfig;

/// One "what-if" perturbation of the baseline factory.
///
/// Specs are immutable value objects, generated once per request and paired
/// positionally with their metrics in the report. Baseline is always first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario_type", rename_all = "snake_case")]
pub enum ScenarioSpec {
    /// The factory exactly as described.
    Baseline,
    /// A rush order arrives: the named job's due time is halved
    /// (integer division), putting it under more on-time pressure.
    /// The dispatch rule itself is unchanged, so the schedule is identical
    /// to baseline; only the job's reported lateness can grow.
    RushArrives { rush_job_id: String },
    /// The named machine degrades: every step routed through it takes
    /// `slowdown_factor` times as long.
    MachineSlowdown { machine_id: String, slowdown_factor: u64 },
}

impl fmt::Display for ScenarioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioSpec::Baseline => write!(f, "baseline"),
            ScenarioSpec::RushArrives { rush_job_id } => write!(f, "rush_arrives({})", rush_job_id),
            ScenarioSpec::MachineSlowdown { machine_id, slowdown_factor } => {
                write!(f, "machine_slowdown({}, x{})", machine_id, slowdown_factor)
            }
        }
    }
}

/// Wiring for the default scenario set.
///
/// Which job is "the" rush job and which machine is "the" slowdown target
/// are conventions of the deployment, not of the algorithm, so they are
/// carried here and loaded from configuration rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDefaults {
    /// Job targeted by the rush scenario. `None` means the first job in
    /// factory order.
    #[serde(default)]
    pub rush_job_id: Option<String>,
    /// Machine targeted by the slowdown scenario.
    pub slowdown_machine_id: String,
    /// Duration multiplier for the slowdown scenario, at least 2.
    pub slowdown_factor: u64,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            rush_job_id: None,
            slowdown_machine_id: "M2".into(),
            slowdown_factor: 2,
        }
    }
}

impl ScenarioDefaults {
    /// Onboarding-boundary check, alongside [`FactoryConfig::validate`].
    pub fn validate(&self) -> WhatIfResult<()> {
        if self.slowdown_factor < 2 {
            return Err(WhatIfError::invalid_input(format!(
                "slowdown_factor must be at least 2, got {}",
                self.slowdown_factor
            )));
        }
        Ok(())
    }
}

/// Expands a factory into the ordered scenario list to evaluate.
///
/// Always non-empty and always starting with [`ScenarioSpec::Baseline`].
/// A factory without jobs yields only the baseline: there is no job to
/// rush, and slowing an idle machine is indistinguishable from baseline.
pub fn generate(factory: &FactoryConfig, defaults: &ScenarioDefaults) -> Vec<ScenarioSpec> {
    let mut specs = vec![ScenarioSpec::Baseline];

    let rush_job_id = defaults
        .rush_job_id
        .clone()
        .or_else(|| factory.jobs.first().map(|j| j.id.clone()));
    if let Some(rush_job_id) = rush_job_id {
        if !factory.jobs.is_empty() {
            specs.push(ScenarioSpec::RushArrives { rush_job_id });
            specs.push(ScenarioSpec::MachineSlowdown {
                machine_id: defaults.slowdown_machine_id.clone(),
                slowdown_factor: defaults.slowdown_factor,
            });
        }
    }

    specs
}

/// Derives the effective factory for one scenario.
///
/// The input factory is never mutated; the result is a structurally
/// independent copy.
pub fn apply(spec: &ScenarioSpec, factory: &FactoryConfig) -> WhatIfResult<FactoryConfig> {
    let mut effective = factory.clone();
    match spec {
        ScenarioSpec::Baseline => {}
        ScenarioSpec::RushArrives { rush_job_id } => {
            let job = effective
                .jobs
                .iter_mut()
                .find(|j| &j.id == rush_job_id)
                .ok_or_else(|| WhatIfError::unknown_job(rush_job_id))?;
            job.due_time_hour /= 2;
        }
        ScenarioSpec::MachineSlowdown { machine_id, slowdown_factor } => {
            // A factory without the target machine simply does not exhibit
            // this scenario; the copy stays baseline-equivalent.
            if effective.machine(machine_id).is_some() {
                for job in &mut effective.jobs {
                    for step in &mut job.steps {
                        if &step.machine_id == machine_id {
                            step.duration_hours *= slowdown_factor;
                        }
                    }
                }
            }
        }
    }
    Ok(effective)
}
