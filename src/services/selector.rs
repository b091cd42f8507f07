// src/services/selector.rs

//! Source selection with transparent fallback.
//!
//! Routing, per call:
//! 1. `RoutingMode::Primary`: try primary, fall back to secondary on failure.
//! 2. `RoutingMode::Secondary`: secondary only.
//! 3. `RoutingMode::Auto`: consult `SourceHealth`, probing once if the
//!    outcome is unknown or stale; healthy routes to primary, anything
//!    else to secondary.
//! 4. Whatever the route, a failing primary call falls back to secondary once.
//!
//! A missing record is never papered over by the other source, and a call
//! only fails outright when both sources fail.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{
    CategoryRecord, Config, MAX_PRIMARY_RETRIES, ProductRecord, ResultPage, RoutingMode,
    SearchCriteria,
};
use crate::services::health::{ProbeOutcome, SourceHealth};
use crate::sources::CatalogSource;

/// Default liveness probe budget.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

type ProbeFuture = Shared<BoxFuture<'static, ProbeOutcome>>;

/// A probe handed out to callers, with the time it was created.
///
/// The future only makes progress while someone awaits it, so one whose
/// callers all went away is replaced once its budget has elapsed.
struct InFlightProbe {
    started: Instant,
    future: ProbeFuture,
}

/// Which source a call is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Primary,
    Secondary,
}

/// Single catalog API over a primary and a secondary source.
pub struct SourceSelector {
    primary: Arc<dyn CatalogSource>,
    secondary: Arc<dyn CatalogSource>,
    health: Arc<SourceHealth>,
    mode: RwLock<RoutingMode>,
    probe_timeout: Duration,
    primary_retries: u32,
    /// Probe currently running, shared by every caller that needs one.
    in_flight: Mutex<Option<InFlightProbe>>,
}

impl SourceSelector {
    /// Create a selector in `Auto` mode with the default probe timeout.
    pub fn new(
        primary: Arc<dyn CatalogSource>,
        secondary: Arc<dyn CatalogSource>,
        health: Arc<SourceHealth>,
    ) -> Self {
        Self {
            primary,
            secondary,
            health,
            mode: RwLock::new(RoutingMode::Auto),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            primary_retries: 0,
            in_flight: Mutex::new(None),
        }
    }

    /// Create a selector using the routing and probe settings in `config`.
    pub fn from_config(
        config: &Config,
        primary: Arc<dyn CatalogSource>,
        secondary: Arc<dyn CatalogSource>,
        health: Arc<SourceHealth>,
    ) -> Self {
        let selector = Self::new(primary, secondary, health)
            .with_probe_timeout(config.catalog.probe_timeout())
            .with_primary_retries(config.catalog.primary_retries);
        selector.set_mode(config.routing.mode);
        selector
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Extra primary attempts on transient failure, capped at `MAX_PRIMARY_RETRIES`.
    pub fn with_primary_retries(mut self, retries: u32) -> Self {
        self.primary_retries = retries.min(MAX_PRIMARY_RETRIES);
        self
    }

    pub fn health(&self) -> &Arc<SourceHealth> {
        &self.health
    }

    pub fn mode(&self) -> RoutingMode {
        *self.mode.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pin routing to one source, or return to health-based routing.
    pub fn set_mode(&self, mode: RoutingMode) {
        let mut current = self.mode.write().unwrap_or_else(PoisonError::into_inner);
        if *current != mode {
            log::info!("Routing mode: {:?} -> {:?}", *current, mode);
        }
        *current = mode;
    }

    /// Clear health to `Unknown` and drop any override.
    pub fn reset(&self) {
        self.health.reset();
        self.set_mode(RoutingMode::Auto);
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        log::info!("Source selector reset");
    }

    /// Decide where the next call goes, probing if health is unknown or stale.
    pub async fn route(&self) -> SourceKind {
        match self.mode() {
            RoutingMode::Primary => SourceKind::Primary,
            RoutingMode::Secondary => SourceKind::Secondary,
            RoutingMode::Auto => {
                let outcome = match self.health.usable_outcome() {
                    Some(outcome) => outcome,
                    None => self.probe().await,
                };
                if outcome == ProbeOutcome::Healthy {
                    SourceKind::Primary
                } else {
                    SourceKind::Secondary
                }
            }
        }
    }

    /// Probe the primary now and record the outcome.
    ///
    /// Concurrent callers share one in-flight probe and all observe its outcome.
    pub async fn probe(&self) -> ProbeOutcome {
        let probe = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(running)
                    if running.future.peek().is_none()
                        && running.started.elapsed() <= self.probe_timeout =>
                {
                    running.future.clone()
                }
                _ => {
                    if slot.take().is_some() {
                        log::debug!("Replacing stale probe of {}", self.primary.name());
                    }
                    let probe = Self::run_probe(
                        Arc::clone(&self.primary),
                        Arc::clone(&self.health),
                        self.probe_timeout,
                    )
                    .boxed()
                    .shared();
                    *slot = Some(InFlightProbe {
                        started: Instant::now(),
                        future: probe.clone(),
                    });
                    probe
                }
            }
        };

        let outcome = probe.clone().await;

        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot
            .as_ref()
            .is_some_and(|running| running.future.ptr_eq(&probe))
        {
            *slot = None;
        }
        outcome
    }

    async fn run_probe(
        primary: Arc<dyn CatalogSource>,
        health: Arc<SourceHealth>,
        timeout: Duration,
    ) -> ProbeOutcome {
        let epoch = health.epoch();
        let started = Instant::now();

        // Dropping the probe future on timeout cancels the request.
        let outcome = match tokio::time::timeout(timeout, primary.probe()).await {
            Ok(Ok(())) => ProbeOutcome::Healthy,
            Ok(Err(e)) => {
                log::warn!("Probe of {} failed: {}", primary.name(), e);
                ProbeOutcome::Unhealthy
            }
            Err(_) => {
                log::warn!(
                    "Probe of {} timed out after {}ms",
                    primary.name(),
                    timeout.as_millis()
                );
                ProbeOutcome::Unhealthy
            }
        };

        if health.record_for_epoch(outcome, epoch) {
            log::info!(
                "Probe of {}: {:?} in {}ms",
                primary.name(),
                outcome,
                started.elapsed().as_millis()
            );
        } else {
            log::debug!("Discarding probe outcome {:?} recorded across a reset", outcome);
        }
        outcome
    }

    /// Search one 0-based page.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<ResultPage<ProductRecord>> {
        let criteria = criteria.clone();
        self.dispatch("search", move |source| {
            let criteria = criteria.clone();
            async move { source.search(&criteria, page).await }.boxed()
        })
        .await
    }

    /// Fetch one product by id.
    pub async fn get_detail(&self, id: i64) -> Result<ProductRecord> {
        self.dispatch("detail", move |source| {
            async move { source.get_detail(id).await }.boxed()
        })
        .await
    }

    /// Fetch the flat category list.
    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.dispatch("categories", |source| {
            async move { source.list_categories().await }.boxed()
        })
        .await
    }

    async fn dispatch<T, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: Fn(Arc<dyn CatalogSource>) -> BoxFuture<'static, Result<T>>,
    {
        match self.route().await {
            SourceKind::Primary => self.primary_with_fallback(op, &call).await,
            SourceKind::Secondary => {
                log::debug!("{op}: routed to {}", self.secondary.name());
                call(Arc::clone(&self.secondary)).await
            }
        }
    }

    async fn primary_with_fallback<T, F>(&self, op: &'static str, call: &F) -> Result<T>
    where
        F: Fn(Arc<dyn CatalogSource>) -> BoxFuture<'static, Result<T>>,
    {
        let mut attempt = 0;
        let primary_error = loop {
            match call(Arc::clone(&self.primary)).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_not_found() => return Err(e),
                Err(e) if e.is_transient() && attempt < self.primary_retries => {
                    attempt += 1;
                    log::debug!(
                        "{op}: {} attempt {} failed ({}), retrying",
                        self.primary.name(),
                        attempt,
                        e
                    );
                }
                Err(e) => break e,
            }
        };

        log::warn!(
            "{op}: {} failed ({}), falling back to {}",
            self.primary.name(),
            primary_error,
            self.secondary.name()
        );

        match call(Arc::clone(&self.secondary)).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_not_found() => Err(e),
            Err(secondary_error) => {
                log::error!("{op}: both sources failed");
                Err(AppError::both_failed(primary_error, secondary_error))
            }
        }
    }
}
