//! Scripted sources for pipeline tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use ratelog_fetch::{CollectRequest, FetchClient, Source, SourceCapabilities, SourceError};
use ratelog_types::{Field, Observation, SourcePayload};

type Outcome = Box<dyn Fn(&CollectRequest) -> Result<SourcePayload, SourceError> + Send + Sync>;

pub(crate) struct FakeSource {
    name: &'static str,
    capabilities: SourceCapabilities,
    outcome: Outcome,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub(crate) fn new(
        name: &'static str,
        outcome: impl Fn(&CollectRequest) -> Result<SourcePayload, SourceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            capabilities: SourceCapabilities::HISTORICAL,
            outcome: Box::new(outcome),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn ok(name: &'static str, payload: SourcePayload) -> Self {
        Self::new(name, move |_| Ok(payload.clone()))
    }

    pub(crate) fn failing(
        name: &'static str,
        error: impl Fn() -> SourceError + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |_| Err(error()))
    }

    pub(crate) fn snapshot(mut self) -> Self {
        self.capabilities = SourceCapabilities::SNAPSHOT;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Source for FakeSource {
    fn name(&self) -> &str {
        self.name
    }

    fn capabilities(&self) -> SourceCapabilities {
        self.capabilities
    }

    async fn collect(
        &self,
        _client: &FetchClient,
        request: &CollectRequest,
    ) -> Result<SourcePayload, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.outcome)(request)
    }
}

pub(crate) fn observations(field: Field, value: f64) -> SourcePayload {
    SourcePayload::Observations(vec![Observation::percent(field, value)])
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
