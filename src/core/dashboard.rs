use crate::core::aggregate::{aggregate, AggregateFields};
use crate::core::ingest::load_records;
use crate::domain::model::Aggregation;
use crate::domain::ports::DataSource;
use crate::utils::error::{DashboardError, ErrorCategory, ErrorSeverity, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded(Aggregation),
    Failed(LoadFailure),
}

/// What the dashboard keeps of an error once the load has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub message: String,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub suggestion: &'static str,
}

impl From<&DashboardError> for LoadFailure {
    fn from(error: &DashboardError) -> Self {
        Self {
            message: error.to_string(),
            category: error.category(),
            severity: error.severity(),
            suggestion: error.recovery_suggestion(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result (data or failure) is now the dashboard state.
    Committed { generation: u64 },
    /// A newer load started while this one was in flight; its result was dropped.
    Superseded { generation: u64, latest: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub fields: AggregateFields,
    pub timeout: Option<Duration>,
    pub sort_by_year: bool,
}

/// Holds the single summary shown to the user.
///
/// Every [`Dashboard::reload`] takes a new generation number before it
/// fetches. Its result is only written back when no later reload has been
/// started in the meantime, so overlapping reloads resolve to the most
/// recently requested one.
pub struct Dashboard<S: DataSource> {
    source: S,
    options: DashboardOptions,
    generation: AtomicU64,
    state: Arc<RwLock<LoadState>>,
}

impl<S: DataSource> Dashboard<S> {
    pub fn new(source: S, options: DashboardOptions) -> Self {
        Self {
            source,
            options,
            generation: AtomicU64::new(0),
            state: Arc::new(RwLock::new(LoadState::Loading)),
        }
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn reload(&self) -> LoadOutcome {
        // token and Loading are taken together so an older reload can never
        // mark the state Loading after a newer one has committed
        let token = {
            let mut state = self.state.write().await;
            let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = LoadState::Loading;
            token
        };
        tracing::debug!("Starting load #{} from {}", token, self.source.locator());

        let next = match self.load().await {
            Ok(aggregation) => {
                tracing::info!(
                    "Load #{} produced {} summary rows ({} records skipped)",
                    token,
                    aggregation.rows.len(),
                    aggregation.skipped.total()
                );
                LoadState::Loaded(aggregation)
            }
            Err(e) => {
                tracing::error!(
                    "Load #{} from {} failed: {} (category: {:?})",
                    token,
                    self.source.locator(),
                    e,
                    e.category()
                );
                LoadState::Failed(LoadFailure::from(&e))
            }
        };

        // compare under the write lock so a newer commit cannot interleave
        let mut state = self.state.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != token {
            tracing::debug!("Dropping result of load #{}, #{} is newer", token, latest);
            return LoadOutcome::Superseded {
                generation: token,
                latest,
            };
        }
        *state = next;
        LoadOutcome::Committed { generation: token }
    }

    async fn load(&self) -> Result<Aggregation> {
        let records = match self.options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, load_records(&self.source))
                .await
                .map_err(|_| DashboardError::Timeout {
                    locator: self.source.locator().to_string(),
                    after: timeout,
                })??,
            None => load_records(&self.source).await?,
        };

        let mut aggregation = aggregate(&records, &self.options.fields);
        if self.options.sort_by_year {
            aggregation.sort_by_year();
        }
        Ok(aggregation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::{Mutex, Notify};

    /// Serves queued responses, optionally waiting on a gate first.
    struct ScriptedSource {
        responses: Mutex<VecDeque<(Option<Arc<Notify>>, Result<Vec<u8>>)>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<(Option<Arc<Notify>>, Result<Vec<u8>>)>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            let (gate, response) = self
                .responses
                .lock()
                .await
                .pop_front()
                .expect("unexpected fetch");
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response
        }

        fn locator(&self) -> &str {
            "scripted://salaries.csv"
        }
    }

    fn csv(body: &str) -> Result<Vec<u8>> {
        Ok(format!("work_year,salary_in_usd\n{}", body).into_bytes())
    }

    #[tokio::test]
    async fn test_starts_loading_then_commits() {
        let source = ScriptedSource::new(vec![(None, csv("2020,100\n2020,200\n2021,50\n"))]);
        let dashboard = Dashboard::new(source, DashboardOptions::default());

        assert_eq!(dashboard.state().await, LoadState::Loading);
        assert_eq!(
            dashboard.reload().await,
            LoadOutcome::Committed { generation: 1 }
        );

        match dashboard.state().await {
            LoadState::Loaded(aggregation) => {
                assert_eq!(aggregation.rows.len(), 2);
                assert_eq!(aggregation.rows[0].average_salary, 150.0);
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_is_an_explicit_state() {
        let source = ScriptedSource::new(vec![(
            None,
            Err(DashboardError::HttpStatus {
                url: "scripted://salaries.csv".to_string(),
                status: 503,
            }),
        )]);
        let dashboard = Dashboard::new(source, DashboardOptions::default());
        dashboard.reload().await;

        match dashboard.state().await {
            LoadState::Failed(failure) => {
                assert!(failure.message.contains("503"));
                assert_eq!(failure.category, ErrorCategory::Transport);
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_load_does_not_overwrite_newer_one() {
        let gate = Arc::new(Notify::new());
        let source = ScriptedSource::new(vec![
            (Some(gate.clone()), csv("2019,1\n")),
            (None, csv("2024,2\n")),
        ]);
        let dashboard = Dashboard::new(source, DashboardOptions::default());

        let stale = dashboard.reload();
        let fresh = async {
            // let the first load reach its gate before starting the second
            tokio::task::yield_now().await;
            let outcome = dashboard.reload().await;
            gate.notify_one();
            outcome
        };
        let (stale, fresh) = tokio::join!(stale, fresh);

        assert_eq!(fresh, LoadOutcome::Committed { generation: 2 });
        assert_eq!(dashboard.generation(), 2);
        assert_eq!(
            stale,
            LoadOutcome::Superseded {
                generation: 1,
                latest: 2
            }
        );
        match dashboard.state().await {
            LoadState::Loaded(aggregation) => assert_eq!(aggregation.rows[0].year, "2024"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_fails_the_load() {
        let gate = Arc::new(Notify::new());
        let source = ScriptedSource::new(vec![(Some(gate), csv("2020,1\n"))]);
        let options = DashboardOptions {
            timeout: Some(Duration::from_millis(50)),
            ..DashboardOptions::default()
        };
        let dashboard = Dashboard::new(source, options);
        dashboard.reload().await;

        match dashboard.state().await {
            LoadState::Failed(failure) => {
                assert!(failure.message.contains("timed out after 50ms"));
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sort_by_year_option() {
        let source = ScriptedSource::new(vec![(None, csv("2022,1\n2020,1\n2021,1\n"))]);
        let options = DashboardOptions {
            sort_by_year: true,
            ..DashboardOptions::default()
        };
        let dashboard = Dashboard::new(source, options);
        dashboard.reload().await;

        let LoadState::Loaded(aggregation) = dashboard.state().await else {
            panic!("expected loaded state");
        };
        let years: Vec<_> = aggregation.rows.iter().map(|r| r.year.as_str()).collect();
        assert_eq!(years, vec!["2020", "2021", "2022"]);
    }

    /// Blocks the calling thread the first time its locator is read.
    struct StallingSource {
        stalled: std::sync::atomic::AtomicBool,
        inner: ScriptedSource,
    }

    #[async_trait]
    impl DataSource for StallingSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            self.inner.fetch().await
        }

        fn locator(&self) -> &str {
            if !self.stalled.swap(true, Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(300));
            }
            self.inner.locator()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stalled_reload_never_leaves_state_loading() {
        // the locator is only read when debug logging is enabled
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();

        let source = StallingSource {
            stalled: std::sync::atomic::AtomicBool::new(false),
            inner: ScriptedSource::new(vec![(None, csv("2019,1\n")), (None, csv("2024,2\n"))]),
        };
        let dashboard = Arc::new(Dashboard::new(source, DashboardOptions::default()));

        let first = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.reload().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = dashboard.reload().await;
        let first = first.await.unwrap();

        assert_eq!(dashboard.generation(), 2);
        let committed = [first, second]
            .iter()
            .filter(|o| matches!(o, LoadOutcome::Committed { generation: 2 }))
            .count();
        assert_eq!(committed, 1);
        assert!(
            matches!(dashboard.state().await, LoadState::Loaded(_)),
            "dashboard left in {:?}",
            dashboard.state().await
        );
    }
}
