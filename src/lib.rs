use serde::Serialize;

use crate::config::AppConfigExt;
use crate::utils::prelude::*;

pub mod config;
pub mod errors;
pub mod factory;
pub mod metrics;
pub mod output;
pub mod scenarios;
pub mod simulator;
pub mod utils;

pub use crate::errors::{WhatIfError, WhatIfResult};
pub use crate::factory::FactoryConfig;
pub use crate::metrics::ScenarioMetrics;
pub use crate::scenarios::{ScenarioDefaults, ScenarioSpec};

/// The core's output: the untouched input factory plus the evaluated
/// scenarios, specs and metrics paired positionally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfReport {
    pub factory: FactoryConfig,
    pub specs: Vec<ScenarioSpec>,
    pub metrics: Vec<ScenarioMetrics>,
}

/// Evaluates every default scenario against the given factory.
///
/// For each generated spec: derive the effective factory, simulate it,
/// reduce the schedule to metrics. Any core failure aborts the whole
/// request; no partial result set is returned.
pub fn evaluate(factory: &FactoryConfig, defaults: &ScenarioDefaults) -> WhatIfResult<WhatIfReport> {
    let specs = scenarios::generate(factory, defaults);

    let mut metrics = Vec::with_capacity(specs.len());
    for spec in &specs {
        let _g = info_span!("scenario", %spec).entered();

        let effective = scenarios::apply(spec, factory)?;
        let schedule = simulator::simulate(&effective)?;
        let derived = metrics::derive(&schedule, &effective)?;
        info!(
            makespan = derived.makespan_hour,
            bottleneck = %derived.bottleneck_machine_id,
            "scenario evaluated"
        );
        metrics.push(derived);
    }

    Ok(WhatIfReport {
        factory: factory.clone(),
        specs,
        metrics,
    })
}

/// Runs the configured what-if evaluation end to end: fetch the factory and
/// scenario defaults from the global config, evaluate, render the outputs.
pub fn run_whatif() -> Result<()> {
    let _g = info_span!("whatif").entered();

    let cfg = config().whatif()?;

    let report = {
        let _g = info_span!("evaluate").entered();
        evaluate(&cfg.factory, &cfg.scenarios)?
    };

    {
        let _g = info_span!("output").entered();
        output::render_report(&report)?;
        println!("{}", output::render_briefing(&report));
    }

    Ok(())
}
