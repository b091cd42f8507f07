// src/services/accumulator.rs

//! Paginated result accumulation for one search session.
//!
//! A `PageAccumulator` is bound to a single criteria snapshot. It fetches
//! pages 0, 1, 2, ... strictly in order, at most one at a time, and exposes
//! the concatenation of everything fetched so far. Changing criteria means
//! building a new accumulator; an existing one is never re-keyed.
//!
//! ```text
//! Idle --fetch_next--> Fetching(n) --ok, has next--> Idle
//!                                  --ok, last------> Exhausted
//!                                  --err-----------> Idle (retry page n)
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ProductRecord, ResultPage, SearchCriteria};
use crate::services::selector::SourceSelector;

/// Anything that can serve numbered result pages for a criteria snapshot.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, criteria: &SearchCriteria, page: u32) -> Result<ResultPage<T>>;
}

#[async_trait]
impl PageSource<ProductRecord> for SourceSelector {
    async fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<ResultPage<ProductRecord>> {
        self.search(criteria, page).await
    }
}

/// Where an accumulator is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// Ready to fetch the next page
    Idle,
    /// Page `n` is in flight
    Fetching(u32),
    /// The last page has been fetched
    Exhausted,
}

/// What a `fetch_next` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page `page` was fetched and its `added` items appended.
    Appended {
        page: u32,
        added: usize,
        has_next: bool,
    },
    /// A fetch was already in flight; the request was ignored.
    InFlight,
    /// No further page exists; no request was issued.
    Exhausted,
    /// The session this fetch belonged to was replaced before it finished.
    Discarded,
}

/// Concatenate page contents in fetch order. No de-duplication.
pub fn flatten<T: Clone>(pages: &[ResultPage<T>]) -> Vec<T> {
    pages
        .iter()
        .flat_map(|page| page.content.iter().cloned())
        .collect()
}

struct Inner<T> {
    state: AccumulatorState,
    pages: Vec<ResultPage<T>>,
    last_error: Option<String>,
}

/// Accumulates result pages for a single, fixed criteria snapshot.
pub struct PageAccumulator<T> {
    criteria: SearchCriteria,
    source: Arc<dyn PageSource<T>>,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone + Send + 'static> PageAccumulator<T> {
    pub fn new(criteria: SearchCriteria, source: Arc<dyn PageSource<T>>) -> Self {
        Self {
            criteria,
            source,
            inner: Mutex::new(Inner {
                state: AccumulatorState::Idle,
                pages: Vec::new(),
                last_error: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn state(&self) -> AccumulatorState {
        self.lock().state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state() == AccumulatorState::Exhausted
    }

    /// Number of pages fetched so far.
    pub fn page_count(&self) -> usize {
        self.lock().pages.len()
    }

    /// `totalElements` reported by the first page, once fetched.
    pub fn total_elements(&self) -> Option<u64> {
        self.lock().pages.first().map(|page| page.total_elements)
    }

    /// Error message from the most recent failed fetch, cleared on success.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// All items fetched so far, in fetch order.
    pub fn items(&self) -> Vec<T> {
        flatten(&self.lock().pages)
    }

    pub fn item_count(&self) -> usize {
        self.lock().pages.iter().map(|page| page.content.len()).sum()
    }

    /// Fetch the next page, unless one is in flight or none remain.
    ///
    /// On failure the page list is left untouched and the same page is
    /// requested again by the next call.
    pub async fn fetch_next(&self) -> Result<FetchOutcome> {
        let page = {
            let mut inner = self.lock();
            match inner.state {
                AccumulatorState::Exhausted => return Ok(FetchOutcome::Exhausted),
                AccumulatorState::Fetching(_) => return Ok(FetchOutcome::InFlight),
                AccumulatorState::Idle => {
                    let page = inner.pages.len() as u32;
                    inner.state = AccumulatorState::Fetching(page);
                    page
                }
            }
        };

        let guard = FetchGuard {
            inner: &self.inner,
            armed: true,
        };
        let result = self
            .source
            .fetch_page(&self.criteria, page)
            .await
            .and_then(|fetched| fetched.validate().map(|()| fetched));
        guard.disarm();

        let mut inner = self.lock();
        match result {
            Ok(fetched) => {
                let has_next = fetched.has_next();
                let added = fetched.content.len();
                inner.pages.push(fetched);
                inner.last_error = None;
                inner.state = if has_next {
                    AccumulatorState::Idle
                } else {
                    AccumulatorState::Exhausted
                };
                log::debug!(
                    "Page {} appended ({} items, {} total){}",
                    page,
                    added,
                    inner.pages.iter().map(|p| p.content.len()).sum::<usize>(),
                    if has_next { "" } else { ", exhausted" }
                );
                Ok(FetchOutcome::Appended {
                    page,
                    added,
                    has_next,
                })
            }
            Err(e) => {
                log::warn!("Page {} fetch failed for [{}]: {}", page, self.criteria, e);
                inner.last_error = Some(e.to_string());
                inner.state = AccumulatorState::Idle;
                Err(e)
            }
        }
    }

    /// Keep fetching until exhausted or `max_pages` pages are held.
    pub async fn fetch_up_to(&self, max_pages: usize) -> Result<usize> {
        while self.page_count() < max_pages {
            match self.fetch_next().await? {
                FetchOutcome::Appended { has_next: true, .. } => continue,
                _ => break,
            }
        }
        Ok(self.page_count())
    }
}

/// Puts a cancelled fetch back to `Idle` so the page can be requested again.
struct FetchGuard<'a, T> {
    inner: &'a Mutex<Inner<T>>,
    armed: bool,
}

impl<T> FetchGuard<'_, T> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<T> Drop for FetchGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if matches!(inner.state, AccumulatorState::Fetching(_)) {
                inner.state = AccumulatorState::Idle;
            }
        }
    }
}
