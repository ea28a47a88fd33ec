//! Consumer-facing event stream.
//!
//! [`EventStream`] owns the transport and runs a background producer that
//! reads raw events, decodes them and queues the results for
//! [`read_next`](EventStream::read_next).
//!
//! ```text
//! EventStream::begin_listening(token)
//!   └─ tokio::spawn(produce) ── RawEventSource ── EventDecoder
//!        │                                           │
//!        ├── ListenHandle ◄── watch ◄── outcome      │
//!        └── read_next()  ◄── mpsc  ◄── ServerEvent ─┘
//! ```

use futures::Stream;
use futures_util::stream;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch, Mutex as AsyncMutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::decoder::EventDecoder;
use crate::error::{StreamError, StreamResult};
use crate::events::ServerEvent;
use crate::sse::{RawEventSource, ReadOutcome};
use crate::traits::LineSource;

/// Default capacity of the decoded event queue.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Externally visible lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    NotStarted,
    Listening,
    Disposed,
}

/// How the background producer stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// The server closed the stream
    Ended,
    /// The listen token was cancelled, the stream was disposed, or the
    /// producer was otherwise stopped
    Cancelled,
    /// The transport failed; the stream cannot be resumed
    Failed(StreamError),
}

impl ListenOutcome {
    /// `Err` only for [`ListenOutcome::Failed`].
    pub fn into_result(self) -> StreamResult<()> {
        match self {
            ListenOutcome::Ended | ListenOutcome::Cancelled => Ok(()),
            ListenOutcome::Failed(err) => Err(err),
        }
    }
}

type OutcomeReceiver = watch::Receiver<Option<ListenOutcome>>;

async fn wait_for_outcome(done: &mut OutcomeReceiver) -> ListenOutcome {
    match done.wait_for(Option::is_some).await {
        Ok(outcome) => outcome.clone().unwrap_or(ListenOutcome::Cancelled),
        // Producer task went away without reporting (aborted or panicked)
        Err(_) => ListenOutcome::Cancelled,
    }
}

/// Completion handle for the background producer.
#[derive(Debug, Clone)]
pub struct ListenHandle {
    done: OutcomeReceiver,
}

impl ListenHandle {
    /// Wait until the producer has stopped and released the transport.
    pub async fn finished(mut self) -> ListenOutcome {
        wait_for_outcome(&mut self.done).await
    }

    /// Outcome if the producer already stopped.
    pub fn outcome(&self) -> Option<ListenOutcome> {
        self.done.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.done.borrow().is_some()
    }
}

enum Lifecycle<S> {
    NotStarted {
        source: RawEventSource<S>,
        tx: mpsc::Sender<ServerEvent>,
    },
    Listening {
        cancel: CancellationToken,
        done: OutcomeReceiver,
    },
    /// `done` resolves once teardown by the first `dispose` has finished
    Disposed {
        done: Option<OutcomeReceiver>,
    },
}

/// Work left to the `dispose` call that observed the lifecycle change.
enum Teardown<S> {
    Close(RawEventSource<S>, watch::Sender<Option<ListenOutcome>>),
    Stop(OutcomeReceiver),
    Await(OutcomeReceiver),
}

impl<S> Lifecycle<S> {
    fn state(&self) -> StreamState {
        match self {
            Lifecycle::NotStarted { .. } => StreamState::NotStarted,
            Lifecycle::Listening { .. } => StreamState::Listening,
            Lifecycle::Disposed { .. } => StreamState::Disposed,
        }
    }
}

/// Long-lived handle on a server push stream.
///
/// # Example
///
/// ```ignore
/// let stream = EventStream::new(source);
/// let token = CancellationToken::new();
/// let handle = stream.begin_listening(&token)?;
///
/// while let Some(event) = stream.read_next(&token).await {
///     println!("{}: {:?}", event.event_type(), event.project_keys());
/// }
///
/// stream.dispose().await;
/// let outcome = handle.finished().await;
/// ```
pub struct EventStream<S> {
    lifecycle: Mutex<Lifecycle<S>>,
    events: AsyncMutex<Option<mpsc::Receiver<ServerEvent>>>,
    decoder: EventDecoder,
    /// Cancelled once by `dispose`/`Drop`; unblocks in-flight reads
    shutdown: CancellationToken,
}

impl<S> std::fmt::Debug for EventStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("state", &self.lock_lifecycle().state())
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl<S> EventStream<S> {
    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle<S>> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.lock_lifecycle().state()
    }
}

impl<S: LineSource> EventStream<S> {
    /// Wrap an open line source with the standard decoder.
    pub fn new(source: S) -> Self {
        Self::with_decoder(source, EventDecoder::new(), DEFAULT_EVENT_BUFFER)
    }

    /// Wrap an open line source with a custom decoder and queue capacity.
    pub fn with_decoder(source: S, decoder: EventDecoder, buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        Self {
            lifecycle: Mutex::new(Lifecycle::NotStarted {
                source: RawEventSource::new(source),
                tx,
            }),
            events: AsyncMutex::new(Some(rx)),
            decoder,
            shutdown: CancellationToken::new(),
        }
    }

    /// Start the background producer.
    ///
    /// Cancelling `token` stops the producer; an already-cancelled token
    /// stops it before any transport read.
    ///
    /// # Errors
    ///
    /// - [`StreamError::NoRuntime`] when called outside a tokio runtime; the
    ///   stream stays `NotStarted`
    /// - [`StreamError::AlreadyStarted`] if already listening
    /// - [`StreamError::Disposed`] after [`dispose`](Self::dispose)
    pub fn begin_listening(&self, token: &CancellationToken) -> StreamResult<ListenHandle> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| StreamError::NoRuntime)?;

        let mut lifecycle = self.lock_lifecycle();
        let placeholder = Lifecycle::Disposed { done: None };
        let (source, tx) = match std::mem::replace(&mut *lifecycle, placeholder) {
            Lifecycle::NotStarted { source, tx } => (source, tx),
            listening @ Lifecycle::Listening { .. } => {
                *lifecycle = listening;
                return Err(StreamError::AlreadyStarted);
            }
            disposed @ Lifecycle::Disposed { .. } => {
                *lifecycle = disposed;
                return Err(StreamError::Disposed);
            }
        };

        let cancel = token.child_token();
        let (done_tx, done_rx) = watch::channel(None);
        runtime.spawn(produce(
            source,
            self.decoder.clone(),
            tx,
            cancel.clone(),
            done_tx,
        ));

        *lifecycle = Lifecycle::Listening {
            cancel,
            done: done_rx.clone(),
        };
        Ok(ListenHandle { done: done_rx })
    }

    /// Next decoded event, in wire order.
    ///
    /// Returns `None` when the stream has ended, was disposed, is not
    /// listening yet, or `token` is (or becomes) cancelled. Never performs
    /// I/O for an already-cancelled token. Only one reader at a time.
    pub async fn read_next(&self, token: &CancellationToken) -> Option<ServerEvent> {
        if token.is_cancelled() || self.shutdown.is_cancelled() {
            return None;
        }
        if self.state() != StreamState::Listening {
            return None;
        }

        let mut events = tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            _ = self.shutdown.cancelled() => return None,
            guard = self.events.lock() => guard,
        };
        let rx = events.as_mut()?;

        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            _ = self.shutdown.cancelled() => None,
            event = rx.recv() => event,
        }
    }

    /// Events as a [`Stream`], ending when [`read_next`](Self::read_next)
    /// returns `None`.
    pub fn events<'a>(
        &'a self,
        token: &'a CancellationToken,
    ) -> impl Stream<Item = ServerEvent> + 'a {
        stream::unfold((), move |()| async move {
            self.read_next(token).await.map(|event| (event, ()))
        })
    }

    /// Stop listening and release the transport.
    ///
    /// Safe to call while a read is in flight (the read returns `None`) and
    /// idempotent. Every call, including concurrent ones, returns only once
    /// the producer has stopped and the transport is closed.
    pub async fn dispose(&self) {
        self.shutdown.cancel();

        let teardown = {
            let mut lifecycle = self.lock_lifecycle();
            let placeholder = Lifecycle::Disposed { done: None };
            match std::mem::replace(&mut *lifecycle, placeholder) {
                Lifecycle::NotStarted { source, tx } => {
                    drop(tx);
                    let (closed_tx, closed_rx) = watch::channel(None);
                    *lifecycle = Lifecycle::Disposed {
                        done: Some(closed_rx),
                    };
                    Teardown::Close(source, closed_tx)
                }
                Lifecycle::Listening { cancel, done } => {
                    cancel.cancel();
                    *lifecycle = Lifecycle::Disposed {
                        done: Some(done.clone()),
                    };
                    Teardown::Stop(done)
                }
                Lifecycle::Disposed { done } => {
                    *lifecycle = Lifecycle::Disposed { done: done.clone() };
                    match done {
                        Some(done) => Teardown::Await(done),
                        None => return,
                    }
                }
            }
        };

        match teardown {
            Teardown::Close(mut source, closed) => {
                source.close().await;
                let _ = closed.send(Some(ListenOutcome::Cancelled));
            }
            Teardown::Stop(mut done) => {
                let outcome = wait_for_outcome(&mut done).await;
                debug!("Producer stopped during dispose: {:?}", outcome);
            }
            Teardown::Await(mut done) => {
                wait_for_outcome(&mut done).await;
                return;
            }
        }

        if let Some(mut rx) = self.events.lock().await.take() {
            rx.close();
        }
        info!("Event stream disposed");
    }
}

impl<S> Drop for EventStream<S> {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Lifecycle::Listening { cancel, .. } = &*self.lock_lifecycle() {
            cancel.cancel();
        }
    }
}

/// Background producer: read, decode, enqueue, until the stream stops.
///
/// Closes the transport on every exit path before reporting the outcome.
async fn produce<S: LineSource>(
    mut source: RawEventSource<S>,
    decoder: EventDecoder,
    tx: mpsc::Sender<ServerEvent>,
    cancel: CancellationToken,
    done: watch::Sender<Option<ListenOutcome>>,
) {
    debug!("Event stream producer started");

    let outcome = loop {
        match source.read_next(&cancel).await {
            Ok(ReadOutcome::Event(raw)) => {
                let Some(event) = decoder.decode(&raw) else {
                    continue;
                };
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break ListenOutcome::Cancelled,
                    sent = tx.send(event) => {
                        if sent.is_err() {
                            debug!("Event receiver closed, stopping producer");
                            break ListenOutcome::Cancelled;
                        }
                    }
                }
            }
            Ok(ReadOutcome::EndOfStream) => break ListenOutcome::Ended,
            Ok(ReadOutcome::Cancelled) => break ListenOutcome::Cancelled,
            Err(err) => {
                error!("Event stream transport failed: {}", err);
                break ListenOutcome::Failed(err.into());
            }
        }
    };

    source.close().await;
    drop(tx);
    info!("Event stream producer stopped: {:?}", outcome);
    let _ = done.send(Some(outcome));
}
