use std::fs::{self, File};
use std::io::BufWriter;

use itertools::Itertools;

use crate::config::AppConfigExt;
use crate::metrics::ScenarioMetrics;
use crate::utils::prelude::*;
use crate::WhatIfReport;

/// Writes the report as JSON (top-level keys `factory`, `specs`, `metrics`)
/// to the configured `output_file`.
pub fn render_report(report: &WhatIfReport) -> Result<()> {
    let path = config().output_file()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(file, report)?;

    info!(path = %path.display(), "report written");
    Ok(())
}

/// Formats the human-readable briefing, one line per scenario, each compared
/// against the baseline (always the first entry of the report).
pub fn render_briefing(report: &WhatIfReport) -> String {
    let mut text = format!(
        "What-if briefing: {} machines, {} jobs, {} scenarios evaluated.\n",
        report.factory.machines.len(),
        report.factory.jobs.len(),
        report.specs.len()
    );

    let baseline = report.metrics.first();
    for (spec, metrics) in report.specs.iter().zip(&report.metrics) {
        let delta = baseline
            .map(|b| metrics.makespan_hour as i64 - b.makespan_hour as i64)
            .unwrap_or(0);
        text.push_str(&format!(
            "- {}: makespan {}h ({:+}h vs baseline), bottleneck {} at {:.0}% busy, late jobs: {}\n",
            spec,
            metrics.makespan_hour,
            delta,
            metrics.bottleneck_machine_id,
            metrics.bottleneck_utilization * 100.0,
            late_jobs(metrics)
        ));
    }

    text
}

fn late_jobs(metrics: &ScenarioMetrics) -> String {
    let late = metrics
        .job_lateness
        .iter()
        .filter(|(_, &hours)| hours > 0)
        .map(|(job_id, hours)| format!("{} (+{}h)", job_id, hours))
        .join(", ");
    if late.is_empty() {
        "none".to_string()
    } else {
        late
    }
}
