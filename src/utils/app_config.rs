use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use config::{Environment, Source};
use lazy_static::lazy_static;

use super::error::Result;

static DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/default_config.toml"));

/// A new type to impl `config::Source`
#[derive(Debug, Clone, serde::Deserialize)]
struct Preset(HashMap<String, config::Value>);

impl config::Source for Preset {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> std::result::Result<HashMap<String, config::Value>, config::ConfigError> {
        let mut kv = self.0.clone();
        // make sure it's not getting endlessly recursive
        kv.remove("presets");
        Ok(kv)
    }
}

/// The main structure holding application config
pub struct AppConfig(config::Config);

impl AppConfig {
    fn new() -> Self {
        // Start with empty
        Self(config::Config::new())
    }

    pub fn setup(&mut self) -> Result<&mut Self> {
        // Merge with default config
        self.0
            .merge(config::File::from_str(&DEFAULT_CONFIG, config::FileFormat::Toml))?;

        // Merge settings with env variables
        self.0.merge(Environment::with_prefix("FABSIM"))?;

        Ok(self)
    }

    /// Load config from a file
    pub fn use_file(&mut self, path: &Path) -> Result<&mut Self> {
        self.0.merge(config::File::from(path))?;
        Ok(self)
    }

    /// Load preset
    pub fn use_preset(&mut self, name: &str) -> Result<&mut Self> {
        // load the preset
        let preset: Preset = self.get(format!("presets.{}", name))?;
        self.0.merge(preset)?;
        Ok(self)
    }

    /// Get a single value and deserialize to the given type
    pub fn get<T, K>(&self, key: K) -> Result<T>
    where
        // use DeserializeOwned, because we are reading CONFIG using RWLock
        // and the lock is released before returning. So T should not borrow
        // anything from CONFIG.
        T: serde::de::DeserializeOwned,
        K: AsRef<str>,
    {
        Ok(self.0.get(key.as_ref())?)
    }

    /// Get a single value and deserialize to the given type
    pub fn fetch<T>(&self) -> Result<T>
    where
        // use DeserializeOwned, because we are reading CONFIG using RWLock
        // and the lock is released before returning. So T should not borrow
        // anything from CONFIG.
        T: serde::de::DeserializeOwned,
    {
        let t = self.0.clone().try_into()?;
        Ok(t)
    }
}

lazy_static! {
    /// global AppConfig instance
    static ref CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::new());
}

pub fn setup() -> Result<()> {
    config_mut().setup()?;
    Ok(())
}

/// global AppConfig instance
pub fn config() -> RwLockReadGuard<'static, AppConfig> {
    CONFIG.read().unwrap()
}

/// mutable global AppConfig instance
pub fn config_mut() -> RwLockWriteGuard<'static, AppConfig> {
    CONFIG.write().unwrap()
}

pub mod prelude {
    pub use super::{config, config_mut};
}
