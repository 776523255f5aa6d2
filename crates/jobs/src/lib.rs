use parking_lot::RwLock;
use sched_core::Filler;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use types::{FillRequest, FillSummary};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status")]
pub enum JobStatus {
    Queued,
    Running,
    Done { result: FillSummary },
    Failed { message: String },
}

/// Finished jobs kept for lookup; older ones are forgotten.
pub const KEEP_FINISHED: usize = 256;

#[derive(Default)]
struct Registry {
    status: HashMap<String, JobStatus>,
    finished: VecDeque<String>,
}

impl Registry {
    fn set(&mut self, id: String, status: JobStatus) {
        if matches!(status, JobStatus::Done { .. } | JobStatus::Failed { .. }) {
            self.finished.push_back(id.clone());
            while self.finished.len() > KEEP_FINISHED {
                if let Some(old) = self.finished.pop_front() {
                    self.status.remove(&old);
                }
            }
        }
        self.status.insert(id, status);
    }
}

type StatusMap = Arc<RwLock<Registry>>;

/// Auto-fill job queue. Jobs run one at a time on a single worker task, in
/// submission order, so two runs never touch the store concurrently.
pub struct InMemJobs<F: Filler> {
    inner: StatusMap,
    tx: mpsc::UnboundedSender<(String, FillRequest)>,
    filler: Arc<F>,
}

impl<F: Filler> Clone for InMemJobs<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            tx: self.tx.clone(),
            filler: self.filler.clone(),
        }
    }
}

impl<F: Filler> InMemJobs<F> {
    /// Spawns the worker; must be called inside a tokio runtime.
    pub fn new(filler: F) -> Self {
        let inner: StatusMap = Default::default();
        let filler = Arc::new(filler);
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker(inner.clone(), filler.clone(), rx));
        Self { inner, tx, filler }
    }

    pub fn enqueue(&self, req: FillRequest) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().set(id.clone(), JobStatus::Queued);
        if self.tx.send((id.clone(), req)).is_err() {
            error!(job = %id, "job worker is gone");
            self.inner.write().set(
                id.clone(),
                JobStatus::Failed {
                    message: "job worker stopped".into(),
                },
            );
        }
        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().status.get(id).cloned()
    }

    pub fn result(&self, id: &str) -> Option<FillSummary> {
        match self.get(id)? {
            JobStatus::Done { result } => Some(result),
            _ => None,
        }
    }

    pub fn filler(&self) -> &F {
        &self.filler
    }
}

async fn worker<F: Filler>(
    map: StatusMap,
    filler: Arc<F>,
    mut rx: mpsc::UnboundedReceiver<(String, FillRequest)>,
) {
    while let Some((id, req)) = rx.recv().await {
        map.write().set(id.clone(), JobStatus::Running);
        match filler.fill(req).await {
            Ok(res) => {
                info!(job = %id, entries_added = res.entries_added, "job done");
                map.write().set(id, JobStatus::Done { result: res });
            }
            Err(e) => {
                error!(job = %id, error = %e, "job failed");
                map.write().set(
                    id,
                    JobStatus::Failed {
                        message: e.to_string(),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Probe {
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Filler for Probe {
        async fn fill(&self, req: FillRequest) -> anyhow::Result<FillSummary> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            self.running.fetch_sub(1, Ordering::SeqCst);
            if req.week == 0 {
                anyhow::bail!("week 0 does not exist");
            }
            Ok(FillSummary {
                entries_added: req.week,
                ..FillSummary::default()
            })
        }
    }

    fn req(week: u32) -> FillRequest {
        FillRequest {
            week,
            semester: 1,
            fill_type: Default::default(),
            seed: None,
        }
    }

    async fn settle<F: Filler>(jobs: &InMemJobs<F>, id: &JobId) -> JobStatus {
        loop {
            match jobs.get(&id.0) {
                Some(JobStatus::Queued) | Some(JobStatus::Running) => {
                    tokio::task::yield_now().await
                }
                Some(s) => return s,
                None => panic!("unknown job"),
            }
        }
    }

    #[tokio::test]
    async fn runs_one_job_at_a_time() {
        let jobs = InMemJobs::new(Probe::default());
        let ids: Vec<JobId> = (1..=4).map(|w| jobs.enqueue(req(w))).collect();
        for (w, id) in (1..=4).zip(&ids) {
            match settle(&jobs, id).await {
                JobStatus::Done { result } => assert_eq!(result.entries_added, w),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(jobs.filler().peak.load(Ordering::SeqCst), 1);
        assert_eq!(jobs.result(&ids[2].0).map(|r| r.entries_added), Some(3));
    }

    #[tokio::test]
    async fn failures_are_reported() {
        let jobs = InMemJobs::new(Probe::default());
        let id = jobs.enqueue(req(0));
        match settle(&jobs, &id).await {
            JobStatus::Failed { message } => assert!(message.contains("week 0")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(jobs.result(&id.0).is_none());
        assert!(jobs.get("nope").is_none());
    }

    #[test]
    fn forgets_oldest_finished_jobs() {
        let mut reg = Registry::default();
        reg.set("live".into(), JobStatus::Running);
        for i in 0..KEEP_FINISHED + 2 {
            reg.set(
                format!("job-{i}"),
                JobStatus::Done {
                    result: FillSummary::default(),
                },
            );
        }
        assert!(!reg.status.contains_key("job-0"));
        assert!(!reg.status.contains_key("job-1"));
        assert!(reg.status.contains_key("job-2"));
        assert!(reg.status.contains_key("live"));
        assert_eq!(reg.status.len(), KEEP_FINISHED + 1);
    }
}
