mod engine;

use async_trait::async_trait;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::convert::Infallible;
use tracing::{error, info};

use sched_core::{EngineError, Filler, ScheduleStore, Transact};
use types::{FillRequest, FillSummary};

pub use engine::auto_fill;

#[derive(Clone, Debug)]
pub struct AutoFillConfig {
    /// Attempts per teaching day; a block gets `6 * attempts_per_day` tries
    /// before it is counted as an error.
    pub attempts_per_day: u32,
    /// Fixed seed for every run. A request seed takes precedence.
    pub seed: Option<u64>,
}

impl Default for AutoFillConfig {
    fn default() -> Self {
        Self {
            attempts_per_day: 10,
            seed: None,
        }
    }
}

impl AutoFillConfig {
    pub fn max_attempts(&self) -> u32 {
        types::Day::ALL.len() as u32 * self.attempts_per_day
    }
}

/// Runs auto-fill against a transactional store. A failed run leaves the
/// store untouched apart from a log row with one error.
#[derive(Clone)]
pub struct AutoFiller<S: Transact> {
    store: S,
    config: AutoFillConfig,
}

impl<S: Transact> AutoFiller<S> {
    pub fn new(store: S, config: AutoFillConfig) -> Self {
        Self { store, config }
    }

    pub fn run(&self, req: &FillRequest) -> Result<FillSummary, EngineError> {
        let seed = req
            .seed
            .or(self.config.seed)
            .unwrap_or_else(rand::random::<u64>);
        info!(
            seed,
            week = req.week,
            semester = req.semester,
            fill_type = req.fill_type.as_str(),
            "auto-fill started"
        );
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let res = self
            .store
            .transaction(|tx| auto_fill(tx, req, &self.config, &mut rng));
        if let Err(e) = &res {
            error!(error = %e, seed, "auto-fill rolled back");
            let failed = FillSummary {
                errors: 1,
                ..FillSummary::default()
            };
            let log = self
                .store
                .transaction(|tx| {
                    Ok::<_, Infallible>(tx.append_log(
                        req.week,
                        req.semester,
                        req.fill_type,
                        failed,
                    ))
                })
                .unwrap_or_else(|never| match never {});
            info!(log = log.id.0, "failed run logged");
        }
        res
    }
}

#[async_trait]
impl<S: Transact + Clone> Filler for AutoFiller<S> {
    /// The run holds the store's write lock, so it goes to the blocking pool.
    async fn fill(&self, req: FillRequest) -> anyhow::Result<FillSummary> {
        let filler = self.clone();
        let summary = tokio::task::spawn_blocking(move || filler.run(&req)).await??;
        Ok(summary)
    }
}
