//! Shared test doubles: a scriptable catalog source and a tiny HTTP server.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storefront::error::{AppError, Result};
use storefront::models::{
    CatalogRef, CategoryRecord, CategoryRef, Condition, ProductRecord, ProductStatus, ResultPage,
    SearchCriteria,
};
use storefront::sources::CatalogSource;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// How a scripted call behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    Fail,
    NotFound,
}

/// How the scripted liveness probe behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBehavior {
    Healthy,
    Unhealthy,
    /// Never answers
    Hang,
    /// Answers healthy after a delay
    Slow(Duration),
}

pub struct ScriptedSource {
    pub name: &'static str,
    /// Offset applied to product ids so results reveal which source served them.
    pub id_base: i64,
    pub behavior: Mutex<Behavior>,
    pub probe_behavior: Mutex<ProbeBehavior>,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub category_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(name: &'static str, id_base: i64) -> Self {
        Self {
            name,
            id_base,
            behavior: Mutex::new(Behavior::Succeed),
            probe_behavior: Mutex::new(ProbeBehavior::Healthy),
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
        }
    }

    pub fn behaving(self, behavior: Behavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    pub fn probing(self, probe: ProbeBehavior) -> Self {
        *self.probe_behavior.lock().unwrap() = probe;
        self
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn details(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> Result<()> {
        match *self.behavior.lock().unwrap() {
            Behavior::Succeed => Ok(()),
            Behavior::Fail => Err(AppError::Status {
                status: 503,
                url: format!("http://{}/", self.name),
            }),
            Behavior::NotFound => Err(AppError::not_found("scripted")),
        }
    }
}

pub fn product(id: i64) -> ProductRecord {
    ProductRecord {
        id,
        name: format!("Product {id}"),
        catalog: CatalogRef {
            id: None,
            category: CategoryRef {
                id: 1,
                name: "Electronics".to_string(),
            },
        },
        price: 1000.0 * id as f64,
        condition: Condition::New,
        condition_grade: None,
        stock_quantity: 3,
        status: ProductStatus::Active,
        attributes: Default::default(),
        created_at: None,
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<ResultPage<ProductRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome()?;
        let items = (0..3).map(|i| product(self.id_base + i)).collect();
        Ok(ResultPage::from_items(items, page, criteria.page_size))
    }

    async fn get_detail(&self, id: i64) -> Result<ProductRecord> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome()?;
        Ok(product(self.id_base + id))
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome()?;
        Ok(vec![CategoryRecord::root(self.id_base, self.name)])
    }

    async fn probe(&self) -> Result<()> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.probe_behavior.lock().unwrap();
        match behavior {
            ProbeBehavior::Healthy => Ok(()),
            ProbeBehavior::Unhealthy => Err(AppError::Status {
                status: 500,
                url: "http://primary/health".to_string(),
            }),
            ProbeBehavior::Hang => futures::future::pending().await,
            ProbeBehavior::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

/// Accepts connections and never answers them.
pub async fn silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// Answers each request with the `(status, body)` chosen by `route` for its path.
pub async fn canned_server(route: fn(&str) -> (u16, String)) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0_u8; 8192];
                let mut read = 0;
                loop {
                    let n = stream.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        return;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf[..read]);
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                let (status, body) = route(&path);
                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    addr
}
