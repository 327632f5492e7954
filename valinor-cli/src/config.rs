use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use valinor_maxspeed::{LegalDefaultLookup, LegalDefaultSpeeds};

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rule table to use instead of the embedded one
    #[serde(default)]
    pub legal_defaults: Option<PathBuf>,
    /// Size of the worker pool for pass 2
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Config {
    /// Reads the config file, or falls back to defaults if there is none.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn legal_default_speeds(&self) -> anyhow::Result<Arc<dyn LegalDefaultLookup>> {
        let table = if let Some(path) = &self.legal_defaults {
            LegalDefaultSpeeds::from_path(path)
                .with_context(|| format!("Failed to load rule table {}", path.display()))?
        } else {
            LegalDefaultSpeeds::embedded().context("The embedded rule table is broken")?
        };
        info!(version = table.version(), "Loaded legal default speeds");
        Ok(Arc::new(table))
    }

    pub fn init_thread_pool(&self) -> anyhow::Result<()> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("Failed to set up the worker pool")?;
        }
        Ok(())
    }
}
