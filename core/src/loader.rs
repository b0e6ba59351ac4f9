//! Background loader: runs fetch+parse off the owning thread and keeps a
//! single "current results" snapshot.
//!
//! # Design
//! The owner (the thread that renders results) is the only thread that
//! touches loader state. Each `search` spawns a worker thread that executes
//! the request and sends a `Delivery` tagged with its `RequestId` back over
//! a channel of its own; the worker holds the only sender, so a worker that
//! dies without delivering shows up as a disconnect and is published as a
//! failure instead of leaving the loader stuck in `Loading`. The owner applies a delivery only if it belongs to the
//! current request and that request's `CancellationToken` has not fired,
//! so a slow superseded request can never overwrite a newer one
//! (last-request-wins). Workers also check the token before sending,
//! which saves the channel hop for requests that are already dead. The
//! network call itself is never aborted.
//!
//! Failures are delivered as an empty list, exactly like "no matches";
//! the underlying `ApiError` is kept in `last_error` for logs and tests.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, error};

use crate::client::BooksClient;
use crate::error::ApiError;
use crate::fetch::{log_failure, try_fetch_books, Transport};
use crate::http::HttpRequest;
use crate::query::{SearchOptions, SearchQuery};
use crate::types::BookRecord;

/// Loader lifecycle. There is deliberately no error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading,
    Delivered,
}

/// Identifies one `search` call on one loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared flag a worker and its owner use to agree a request is dead.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct Pending {
    id: RequestId,
    token: CancellationToken,
}

struct Delivery {
    id: RequestId,
    outcome: Result<Vec<BookRecord>, ApiError>,
}

pub struct BookLoader<T> {
    client: BooksClient,
    transport: Arc<T>,
    state: LoaderState,
    pending: Option<Pending>,
    next_id: u64,
    results: Arc<[BookRecord]>,
    last_error: Option<ApiError>,
    receiver: Option<Receiver<Delivery>>,
}

impl<T> BookLoader<T>
where
    T: Transport + Send + Sync + 'static,
{
    pub fn new(client: BooksClient, transport: T) -> Self {
        Self::with_shared_transport(client, Arc::new(transport))
    }

    pub fn with_shared_transport(client: BooksClient, transport: Arc<T>) -> Self {
        Self {
            client,
            transport,
            state: LoaderState::Idle,
            pending: None,
            next_id: 0,
            results: Arc::from(Vec::new()),
            last_error: None,
            receiver: None,
        }
    }

    /// Start a search, superseding any request still in flight.
    ///
    /// Invalid input fails here without touching the current state.
    pub fn search(
        &mut self,
        query: &SearchQuery,
        options: &SearchOptions,
    ) -> Result<RequestId, ApiError> {
        let request = self.client.build_search(query, options)?;
        Ok(self.start(request))
    }

    /// Start loading an already-built request.
    pub fn start(&mut self, request: HttpRequest) -> RequestId {
        if let Some(previous) = self.pending.take() {
            debug!("request {} superseded", previous.id);
            previous.token.cancel();
        }

        self.next_id += 1;
        let id = RequestId(self.next_id);
        let token = CancellationToken::new();

        let worker_token = token.clone();
        let transport = Arc::clone(&self.transport);
        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(format!("book-loader-{}", id.0))
            .spawn(move || {
                let outcome = try_fetch_books(transport.as_ref(), &request);
                if let Err(err) = &outcome {
                    log_failure(&request.url, err);
                }
                if worker_token.is_cancelled() {
                    debug!("request {id} finished after cancellation, dropping result");
                    return;
                }
                if sender.send(Delivery { id, outcome }).is_err() {
                    debug!("request {id} finished after the loader went away, dropping result");
                }
            });

        self.pending = Some(Pending { id, token });
        self.receiver = Some(receiver);
        self.state = LoaderState::Loading;

        if let Err(err) = spawned {
            error!("failed to spawn loader thread: {err}");
            self.pending = None;
            self.receiver = None;
            self.publish(Err(ApiError::Transport(format!(
                "failed to spawn loader thread: {err}"
            ))));
        }
        id
    }

    /// Stop waiting for the current request. Loading → Idle.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("request {} cancelled", pending.id);
            pending.token.cancel();
            self.receiver = None;
            self.state = LoaderState::Idle;
        }
    }

    /// Apply a pending delivery without blocking.
    ///
    /// Returns the new snapshot when the current request was delivered by
    /// this call.
    pub fn poll(&mut self) -> Option<Arc<[BookRecord]>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(delivery) => self.apply(delivery).then(|| self.results()),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.abandon(),
        }
    }

    /// Block until the current request is delivered.
    ///
    /// Returns `None` immediately when nothing is loading.
    pub fn wait(&mut self) -> Option<Arc<[BookRecord]>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.recv() {
            Ok(delivery) => self.apply(delivery).then(|| self.results()),
            Err(_) => self.abandon(),
        }
    }

    /// `wait` with an upper bound. The request stays current on timeout.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Arc<[BookRecord]>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.recv_timeout(timeout) {
            Ok(delivery) => self.apply(delivery).then(|| self.results()),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => self.abandon(),
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// The request whose result is awaited, if any.
    pub fn current_request(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Snapshot of the current results. Cheap to clone and share.
    pub fn results(&self) -> Arc<[BookRecord]> {
        Arc::clone(&self.results)
    }

    /// The record at `index` in the current results.
    pub fn book(&self, index: usize) -> Option<&BookRecord> {
        self.results.get(index)
    }

    /// Why the last delivered request produced no records, if it failed.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    fn apply(&mut self, delivery: Delivery) -> bool {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.id == delivery.id && !p.token.is_cancelled());
        if !is_current {
            debug!("discarding stale result for request {}", delivery.id);
            return false;
        }
        self.pending = None;
        self.receiver = None;
        self.publish(delivery.outcome);
        true
    }

    /// The worker for the current request exited without sending anything.
    fn abandon(&mut self) -> Option<Arc<[BookRecord]>> {
        self.receiver = None;
        let pending = self.pending.take()?;
        error!("loader worker for request {} exited without a result", pending.id);
        self.publish(Err(ApiError::Transport(format!(
            "loader worker for request {} exited without a result",
            pending.id
        ))));
        Some(self.results())
    }

    fn publish(&mut self, outcome: Result<Vec<BookRecord>, ApiError>) {
        match outcome {
            Ok(books) => {
                self.results = Arc::from(books);
                self.last_error = None;
            }
            Err(err) => {
                self.results = Arc::from(Vec::new());
                self.last_error = Some(err);
            }
        }
        self.state = LoaderState::Delivered;
    }
}

impl<T> Drop for BookLoader<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }
}
