use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::factory::FactoryConfig;
use crate::scenarios::ScenarioDefaults;
use crate::utils::app_config::AppConfig;
use crate::utils::prelude::*;

/// The `[whatif]` section of the application config: the onboarded factory
/// plus the scenario wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfConfig {
    pub factory: FactoryConfig,
    #[serde(default)]
    pub scenarios: ScenarioDefaults,
}

pub trait AppConfigExt {
    /// Fetches and validates the what-if section. This is the onboarding
    /// boundary: nothing invalid passes beyond this call.
    fn whatif(&self) -> Result<WhatIfConfig>;

    /// Where the JSON report is written.
    fn output_file(&self) -> Result<PathBuf>;
}

impl AppConfigExt for AppConfig {
    fn whatif(&self) -> Result<WhatIfConfig> {
        let cfg: WhatIfConfig = self.get("whatif")?;
        cfg.factory.validate()?;
        cfg.scenarios.validate()?;
        Ok(cfg)
    }

    fn output_file(&self) -> Result<PathBuf> {
        self.get("output_file")
    }
}
