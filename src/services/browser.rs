// src/services/browser.rs

//! Criteria-keyed search sessions.
//!
//! `CatalogBrowser` owns the accumulator for the criteria currently on
//! screen. Setting different criteria replaces it outright; a fetch that was
//! started for the replaced session finishes into the discarded accumulator
//! and is reported as `FetchOutcome::Discarded`, never merged.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AppError, Result};
use crate::models::SearchCriteria;
use crate::services::accumulator::{FetchOutcome, PageAccumulator, PageSource};

pub struct CatalogBrowser<T> {
    source: Arc<dyn PageSource<T>>,
    current: Mutex<Option<Arc<PageAccumulator<T>>>>,
}

impl<T: Clone + Send + 'static> CatalogBrowser<T> {
    pub fn new(source: Arc<dyn PageSource<T>>) -> Self {
        Self {
            source,
            current: Mutex::new(None),
        }
    }

    /// Accumulator for the active criteria, if any.
    pub fn session(&self) -> Option<Arc<PageAccumulator<T>>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn criteria(&self) -> Option<SearchCriteria> {
        self.session().map(|session| session.criteria().clone())
    }

    /// Switch to `criteria`. Returns `true` if a new session was started,
    /// `false` if the criteria equal the active ones.
    pub fn set_criteria(&self, criteria: SearchCriteria) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current
            .as_ref()
            .is_some_and(|session| *session.criteria() == criteria)
        {
            return false;
        }

        log::info!("New search session: {}", criteria);
        *current = Some(Arc::new(PageAccumulator::new(
            criteria,
            Arc::clone(&self.source),
        )));
        true
    }

    /// Drop the active session entirely.
    pub fn clear(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn is_current(&self, session: &Arc<PageAccumulator<T>>) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, session))
    }

    /// Fetch the next page of the active session.
    pub async fn fetch_next(&self) -> Result<FetchOutcome> {
        let session = self
            .session()
            .ok_or_else(|| AppError::validation("no search criteria set"))?;

        let result = session.fetch_next().await;

        if !self.is_current(&session) {
            log::debug!(
                "Discarding page result for superseded session [{}]",
                session.criteria()
            );
            return Ok(FetchOutcome::Discarded);
        }
        result
    }

    /// Items of the active session, in fetch order.
    pub fn items(&self) -> Vec<T> {
        self.session()
            .map(|session| session.items())
            .unwrap_or_default()
    }
}
