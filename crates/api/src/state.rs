use anyhow::Context;
use autofill::{AutoFillConfig, AutoFiller};
use jobs::InMemJobs;
use sched_core::{validate, Catalog, MemStore, Tables};
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: MemStore,
    pub jobs: Arc<InMemJobs<AutoFiller<MemStore>>>,
}

impl AppState {
    pub fn new(tables: Tables, autofill: AutoFillConfig) -> Self {
        let store = MemStore::new(tables);
        let jobs = InMemJobs::new(AutoFiller::new(store.clone(), autofill));
        Self {
            store,
            jobs: Arc::new(jobs),
        }
    }

    /// Builds the state, loading the configured catalog file if any.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut tables = Tables::new();
        if let Some(path) = &config.catalog {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            let catalog: Catalog = serde_json::from_str(&raw)
                .with_context(|| format!("parsing catalog {}", path.display()))?;
            validate(&catalog)?;
            tables.load_catalog(&catalog);
            tracing::info!(
                path = %path.display(),
                groups = catalog.groups.len(),
                requirements = catalog.group_subjects.len(),
                "catalog loaded"
            );
        }
        Ok(Self::new(tables, config.autofill.clone()))
    }
}
