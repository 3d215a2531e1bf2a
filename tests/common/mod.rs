//! Mock ports shared by the integration tests.
//!
//! Each mock records what it was asked so tests can assert exact call
//! counts and ordering.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use mimir::cache::MemoryStore;
use mimir::{
    Body, CachedEntry, ConditionalHeaders, FetchMethod, MimirError, ObjectStore, OriginClient,
    ProxyResponse, RequestIdentity, RevalidationEngine, Result, TelemetryEvent, TelemetrySink,
};
use wiremock::{Match, Request};

/// How long to give detached telemetry tasks to finish.
const TELEMETRY_SETTLE: Duration = Duration::from_millis(50);

// ============================================================================
// Origin
// ============================================================================

/// A canned origin reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub chunks: Vec<&'static str>,
}

impl Reply {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            chunks: Vec::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Body delivered as a single buffered chunk.
    pub fn body(mut self, body: &'static str) -> Self {
        self.chunks = vec![body];
        self
    }

    /// Body delivered as a multi-chunk stream.
    pub fn chunks(mut self, chunks: &[&'static str]) -> Self {
        self.chunks = chunks.to_vec();
        self
    }

    fn into_response(self) -> ProxyResponse {
        let mut headers = HeaderMap::new();
        for (name, value) in self.headers {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        let body = if self.chunks.len() > 1 {
            let chunks: Vec<Result<Bytes>> = self
                .chunks
                .into_iter()
                .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                .collect();
            Body::from_stream(stream::iter(chunks))
        } else {
            Body::from(self.chunks.concat())
        };
        ProxyResponse::new(StatusCode::from_u16(self.status).unwrap(), headers, body)
    }
}

/// One recorded origin call.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginCall {
    pub method: FetchMethod,
    pub url: String,
    pub conditional: ConditionalHeaders,
}

/// Origin answering from per-method reply queues.
#[derive(Default)]
pub struct MockOrigin {
    gets: Mutex<VecDeque<Reply>>,
    heads: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<OriginCall>>,
}

impl MockOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, reply: Reply) -> Self {
        self.gets.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_head(self, reply: Reply) -> Self {
        self.heads.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<OriginCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<FetchMethod> {
        self.calls().into_iter().map(|c| c.method).collect()
    }
}

#[async_trait]
impl OriginClient for MockOrigin {
    async fn fetch(
        &self,
        method: FetchMethod,
        identity: &RequestIdentity,
        conditional: &ConditionalHeaders,
    ) -> Result<ProxyResponse> {
        self.calls.lock().unwrap().push(OriginCall {
            method,
            url: identity.as_str().to_owned(),
            conditional: conditional.clone(),
        });
        let queue = match method {
            FetchMethod::Get => &self.gets,
            FetchMethod::Head => &self.heads,
        };
        let reply = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {} {identity}", method.as_str()));
        Ok(reply.into_response())
    }
}

/// Origin that cannot be reached.
#[derive(Default)]
pub struct UnreachableOrigin {
    pub calls: AtomicU32,
}

#[async_trait]
impl OriginClient for UnreachableOrigin {
    async fn fetch(
        &self,
        _method: FetchMethod,
        identity: &RequestIdentity,
        _conditional: &ConditionalHeaders,
    ) -> Result<ProxyResponse> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(MimirError::OriginTransport(format!(
            "{identity}: connection refused"
        )))
    }
}

// ============================================================================
// Store
// ============================================================================

/// [`MemoryStore`] wrapper counting lookups and writes.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    pub lookups: AtomicU32,
    pub writes: AtomicU32,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Read an entry without counting it as a lookup.
    pub async fn peek(&self, identity: &RequestIdentity) -> Option<CachedEntry> {
        self.inner.lookup(identity).await.unwrap()
    }

    /// Seed an entry without counting it as a write.
    pub async fn seed(&self, identity: &RequestIdentity, entry: CachedEntry) {
        self.inner.store(identity, entry).await.unwrap();
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn lookup(&self, identity: &RequestIdentity) -> Result<Option<CachedEntry>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.lookup(identity).await
    }

    async fn store(&self, identity: &RequestIdentity, entry: CachedEntry) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.inner.store(identity, entry).await
    }
}

/// Store whose writes always fail; lookups always miss.
pub struct ReadOnlyStore;

#[async_trait]
impl ObjectStore for ReadOnlyStore {
    async fn lookup(&self, _identity: &RequestIdentity) -> Result<Option<CachedEntry>> {
        Ok(None)
    }

    async fn store(&self, _identity: &RequestIdentity, _entry: CachedEntry) -> Result<()> {
        Err(MimirError::Store("read-only".into()))
    }
}

/// Store whose lookups fail.
pub struct BrokenStore;

#[async_trait]
impl ObjectStore for BrokenStore {
    async fn lookup(&self, _identity: &RequestIdentity) -> Result<Option<CachedEntry>> {
        Err(MimirError::Store("backend offline".into()))
    }

    async fn store(&self, _identity: &RequestIdentity, _entry: CachedEntry) -> Result<()> {
        Err(MimirError::Store("backend offline".into()))
    }
}

// ============================================================================
// Telemetry
// ============================================================================

/// Sink keeping every recorded event.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    /// Events recorded once pending deliveries have had time to run.
    pub async fn events(&self) -> Vec<TelemetryEvent> {
        tokio::time::sleep(TELEMETRY_SETTLE).await;
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelemetrySink for RecordingSink {
    async fn record(&self, event: TelemetryEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Sink that takes `delay` to record each event.
pub struct SlowSink {
    pub delay: Duration,
    pub finished: AtomicBool,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            finished: AtomicBool::new(false),
        }
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TelemetrySink for SlowSink {
    async fn record(&self, _event: TelemetryEvent) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Sink that always fails.
pub struct FailingSink;

#[async_trait]
impl TelemetrySink for FailingSink {
    async fn record(&self, _event: TelemetryEvent) -> Result<()> {
        Err(MimirError::Configuration("analytics dataset missing".into()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Identity on the test bucket for `path`.
pub fn identity(path: &str) -> RequestIdentity {
    RequestIdentity::parse(&format!("https://bucket.example{path}")).unwrap()
}

/// Engine wired to the given mocks.
pub fn engine(
    origin: &Arc<MockOrigin>,
    store: &Arc<CountingStore>,
    sink: &Arc<RecordingSink>,
) -> RevalidationEngine {
    RevalidationEngine::new(origin.clone(), store.clone(), sink.clone())
}

/// Collect a response body as UTF-8.
pub async fn body_text(response: ProxyResponse) -> String {
    let bytes = response.body.into_bytes().await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Header names of a map, sorted.
pub fn header_names(headers: &HeaderMap) -> Vec<String> {
    let mut names: Vec<String> = headers.keys().map(|k| k.as_str().to_owned()).collect();
    names.sort();
    names
}

// ============================================================================
// Wiremock matchers
// ============================================================================

/// Matches requests that do not carry the named header.
pub struct NoHeader(pub &'static str);

impl Match for NoHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}

/// Matches a header by its exact raw value.
///
/// `wiremock::matchers::header` splits values on commas, which breaks
/// HTTP dates such as `Tue, 15 Nov 1994 12:45:26 GMT`.
pub struct RawHeader(pub &'static str, pub &'static str);

impl Match for RawHeader {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get(self.0)
            .is_some_and(|value| value.as_bytes() == self.1.as_bytes())
    }
}
