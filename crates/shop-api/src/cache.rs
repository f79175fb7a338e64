//! # Page Cache
//!
//! Generated pages keyed by route path. A page is served as-is until its
//! revalidation interval elapses, then regenerated on the next request.
//! When regeneration fails the stale copy keeps being served.

use chrono::{DateTime, Utc};
use shop_core::ShopResult;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Output of a page generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Page { html: String, revalidate: Duration },
    Redirect(&'static str),
}

/// What the handler should send back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Page(String),
    Redirect(&'static str),
}

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Fresh(String),
    Stale(String),
    Miss,
}

#[derive(Debug, Clone)]
struct CachedPage {
    html: String,
    generated_at: DateTime<Utc>,
    revalidate: Duration,
}

impl CachedPage {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        // Negative age (clock moved backwards) counts as fresh
        now.signed_duration_since(self.generated_at)
            .to_std()
            .map(|age| age < self.revalidate)
            .unwrap_or(true)
    }
}

/// Route path → generated HTML
#[derive(Debug, Default)]
pub struct PageCache {
    pages: RwLock<HashMap<String, CachedPage>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a page and report whether it is still fresh
    pub async fn get(&self, key: &str) -> CacheLookup {
        let pages = self.pages.read().await;
        match pages.get(key) {
            Some(page) if page.is_fresh(Utc::now()) => CacheLookup::Fresh(page.html.clone()),
            Some(page) => CacheLookup::Stale(page.html.clone()),
            None => CacheLookup::Miss,
        }
    }

    /// Store a freshly generated page
    pub async fn insert(&self, key: impl Into<String>, html: String, revalidate: Duration) {
        let page = CachedPage {
            html,
            generated_at: Utc::now(),
            revalidate,
        };
        self.pages.write().await.insert(key.into(), page);
    }

    pub async fn remove(&self, key: &str) {
        self.pages.write().await.remove(key);
    }

    /// Number of cached pages
    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Serve `key` from cache, regenerating it when missing or stale.
    ///
    /// Redirects are never cached and evict any page stored under `key`.
    /// A failed regeneration falls back to the stale page if there is one.
    pub async fn render_with<F, Fut>(&self, key: &str, generate: F) -> ShopResult<Rendered>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ShopResult<Generation>>,
    {
        let stale = match self.get(key).await {
            CacheLookup::Fresh(html) => {
                debug!("Serving fresh page {}", key);
                return Ok(Rendered::Page(html));
            }
            CacheLookup::Stale(html) => Some(html),
            CacheLookup::Miss => None,
        };

        match generate().await {
            Ok(Generation::Page { html, revalidate }) => {
                self.insert(key, html.clone(), revalidate).await;
                Ok(Rendered::Page(html))
            }
            Ok(Generation::Redirect(destination)) => {
                self.remove(key).await;
                Ok(Rendered::Redirect(destination))
            }
            Err(e) => match stale {
                Some(html) => {
                    warn!("Regenerating {} failed, serving stale page: {}", key, e);
                    Ok(Rendered::Page(html))
                }
                None => Err(e),
            },
        }
    }
}
