// src/services/health.rs

//! Observed health of the primary source.
//!
//! A `SourceHealth` starts out `Unknown` and only changes when a probe
//! records an outcome or when it is explicitly reset. Ordinary search and
//! detail calls never touch it, even when they fail.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Result of the most recent liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
}

/// Point-in-time copy of the health state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct HealthSnapshot {
    pub outcome: ProbeOutcome,
    pub probed_at: Option<DateTime<Utc>>,
}

/// Health state shared by one selector, injected at construction.
#[derive(Debug, Default)]
pub struct SourceHealth {
    state: RwLock<HealthSnapshot>,
    /// Bumped on every reset; probes started before a reset may not record.
    epoch: AtomicU64,
    ttl: Option<Duration>,
}

impl SourceHealth {
    /// Health state whose outcome never expires.
    pub fn new() -> Self {
        Self::default()
    }

    /// Health state whose outcome goes stale after `ttl`.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Outcome usable for routing, or `None` when a probe is needed
    /// (nothing recorded yet, or the recorded outcome is stale).
    pub fn usable_outcome(&self) -> Option<ProbeOutcome> {
        self.usable_outcome_at(Utc::now())
    }

    pub fn usable_outcome_at(&self, now: DateTime<Utc>) -> Option<ProbeOutcome> {
        let snapshot = self.snapshot();
        if snapshot.outcome == ProbeOutcome::Unknown {
            return None;
        }

        match (self.ttl, snapshot.probed_at) {
            (Some(ttl), Some(probed_at)) => {
                let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
                if now.signed_duration_since(probed_at) > ttl {
                    None
                } else {
                    Some(snapshot.outcome)
                }
            }
            _ => Some(snapshot.outcome),
        }
    }

    /// Record a probe outcome stamped with the current time.
    pub fn record(&self, outcome: ProbeOutcome) {
        self.record_at(outcome, Utc::now());
    }

    pub fn record_at(&self, outcome: ProbeOutcome, probed_at: DateTime<Utc>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = HealthSnapshot {
            outcome,
            probed_at: Some(probed_at),
        };
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Record only if no reset happened since `epoch` was read.
    pub(crate) fn record_for_epoch(&self, outcome: ProbeOutcome, epoch: u64) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.epoch.load(Ordering::Acquire) != epoch {
            return false;
        }
        *state = HealthSnapshot {
            outcome,
            probed_at: Some(Utc::now()),
        };
        true
    }

    /// Forget the recorded outcome.
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.epoch.fetch_add(1, Ordering::AcqRel);
        *state = HealthSnapshot::default();
    }
}
