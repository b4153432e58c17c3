//! Versioned cache-first proxy for static assets.
//!
//! [`OfflineCacheProxy`] mirrors the lifecycle of an offline worker:
//! [`install`](OfflineCacheProxy::install) precaches a fixed manifest,
//! [`activate`](OfflineCacheProxy::activate) drops caches left by older
//! versions, and [`handle_fetch`](OfflineCacheProxy::handle_fetch) answers
//! requests from the cache before falling back to the network.
//!
//! The proxy shares nothing with the rendering side of the crate.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// Name of the current cache. Bump the suffix to invalidate older caches.
pub const CACHE_NAME: &str = "qr-generator-v1";

/// Assets stored at install time.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "/qr-generator/",
    "/qr-generator/index.html",
    "/qr-generator/app.js",
    "/qr-generator/style.css",
    "/qr-generator/qrcode-generator.min.js",
    "/qr-generator/icons/icon-72x72.png",
    "/qr-generator/icons/icon-96x96.png",
    "/qr-generator/icons/icon-128x128.png",
    "/qr-generator/icons/icon-144x144.png",
    "/qr-generator/icons/icon-152x152.png",
    "/qr-generator/icons/icon-180x180.png",
    "/qr-generator/icons/icon-192x192.png",
    "/qr-generator/icons/icon-384x384.png",
    "/qr-generator/icons/icon-512x512.png",
];

// ============================================================================
// Requests and responses
// ============================================================================

/// An asset request, keyed by URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub url: String,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// How a response relates to the requesting origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response with readable status and body.
    Basic,
    /// Cross-origin response permitted by CORS.
    Cors,
    /// Cross-origin response whose status and body are hidden.
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub body: Vec<u8>,
}

impl Response {
    /// A same-origin 200 response.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            kind: ResponseKind::Basic,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only successful same-origin responses are worth caching.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

/// Network failure while fetching an asset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("network error fetching {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

/// Install failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot precache {url}: status {status}")]
    BadStatus { url: String, status: u16 },
}

/// Performs network requests on behalf of the proxy.
pub trait Fetcher {
    fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

// ============================================================================
// Cache storage
// ============================================================================

/// A single named cache mapping URLs to responses.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: HashMap<String, Response>,
}

impl Cache {
    pub fn get(&self, request: &Request) -> Option<&Response> {
        self.entries.get(&request.url)
    }

    pub fn put(&mut self, request: &Request, response: Response) {
        self.entries.insert(request.url.clone(), response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The set of named caches available to the proxy.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: BTreeMap<String, Cache>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a cache, creating it if missing.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    /// Looks a request up across every cache, in name order.
    pub fn find(&self, request: &Request) -> Option<&Response> {
        self.caches.values().find_map(|cache| cache.get(request))
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.caches.keys().map(String::as_str)
    }
}

// ============================================================================
// Proxy
// ============================================================================

/// Lifecycle phase of the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Parsed,
    /// Precache done; activation is not delayed by older workers.
    Installed,
    /// Old caches cleaned and clients claimed.
    Activated,
}

/// Cache-first asset proxy with versioned cache invalidation.
#[derive(Debug, Clone)]
pub struct OfflineCacheProxy {
    cache_name: String,
    manifest: Vec<String>,
    storage: CacheStorage,
    state: WorkerState,
}

impl Default for OfflineCacheProxy {
    fn default() -> Self {
        Self::new(CacheStorage::new())
    }
}

impl OfflineCacheProxy {
    /// A proxy using [`CACHE_NAME`] and [`PRECACHE_MANIFEST`] on top of
    /// existing storage (which may hold caches from older versions).
    pub fn new(storage: CacheStorage) -> Self {
        Self::with_manifest(storage, CACHE_NAME, PRECACHE_MANIFEST.iter().copied())
    }

    pub fn with_manifest<I, U>(storage: CacheStorage, cache_name: &str, manifest: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            cache_name: cache_name.to_string(),
            manifest: manifest.into_iter().map(Into::into).collect(),
            storage,
            state: WorkerState::Parsed,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Fetches and stores every manifest entry.
    ///
    /// All or nothing: if any entry fails to fetch or returns a non-OK status,
    /// nothing is stored and the proxy stays uninstalled.
    pub fn install(&mut self, fetcher: &impl Fetcher) -> Result<(), CacheError> {
        let mut fetched = Vec::with_capacity(self.manifest.len());
        for url in &self.manifest {
            let request = Request::new(url.as_str());
            let response = fetcher.fetch(&request)?;
            if !response.is_ok() {
                return Err(CacheError::BadStatus {
                    url: url.clone(),
                    status: response.status,
                });
            }
            fetched.push((request, response));
        }

        let cache = self.storage.open(&self.cache_name);
        log::info!("Opened cache");
        for (request, response) in fetched {
            cache.put(&request, response);
        }

        self.state = WorkerState::Installed;
        Ok(())
    }

    /// Deletes every cache not named [`cache_name`](Self::cache_name).
    ///
    /// Returns the names of the deleted caches.
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .storage
            .names()
            .filter(|name| *name != self.cache_name)
            .map(str::to_string)
            .collect();

        for name in &stale {
            log::info!("Deleting old cache: {name}");
            self.storage.delete(name);
        }

        self.state = WorkerState::Activated;
        stale
    }

    /// Answers a request from the cache, falling back to the network.
    ///
    /// Successful same-origin network responses are stored before being
    /// returned. Network errors propagate when nothing is cached.
    pub fn handle_fetch(
        &mut self,
        request: &Request,
        fetcher: &impl Fetcher,
    ) -> Result<Response, FetchError> {
        if let Some(cached) = self.storage.find(request) {
            log::debug!("cache hit: {}", request.url);
            return Ok(cached.clone());
        }

        let response = fetcher.fetch(request)?;
        if response.is_cacheable() {
            self.storage
                .open(&self.cache_name)
                .put(request, response.clone());
        }
        Ok(response)
    }
}
