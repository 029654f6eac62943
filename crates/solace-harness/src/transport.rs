//! Scripted message transport.

use std::{
    collections::VecDeque,
    future::Future,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use solace_app::{MessageTransport, OutgoingMessage, TransportError, TransportReply};
use tokio::sync::Notify;

/// Reply text used when no reply is queued.
pub const DEFAULT_REPLY: &str = "Mình hiểu...";

type Scripted = Result<TransportReply, TransportError>;

#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<OutgoingMessage>>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport answering from a script.
///
/// Queued replies and failures are consumed in order; once the queue is
/// empty every call succeeds with [`DEFAULT_REPLY`] and server ids
/// `srv-user-N` / `srv-ai-N`. Every request is recorded.
///
/// A gated transport parks each call after recording it until
/// [`release`](Self::release) is called, which lets a test observe the
/// pipeline while it is in `Sending`.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

impl ScriptedTransport {
    /// Transport that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that holds every call until released.
    pub fn gated() -> Self {
        Self { inner: Arc::new(Inner { gate: Some(Gate::default()), ..Inner::default() }) }
    }

    /// Queue a reply.
    pub fn push_reply(&self, reply: TransportReply) {
        lock(&self.inner.script).push_back(Ok(reply));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: TransportError) {
        lock(&self.inner.script).push_back(Err(error));
    }

    /// Requests received so far.
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        lock(&self.inner.sent).clone()
    }

    /// Number of `deliver` calls so far.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Wait until a call has reached the gate.
    ///
    /// Returns immediately for an ungated transport.
    pub async fn entered(&self) {
        if let Some(gate) = &self.inner.gate {
            gate.entered.notified().await;
        }
    }

    /// Let one parked (or the next) call continue.
    pub fn release(&self) {
        if let Some(gate) = &self.inner.gate {
            gate.release.notify_one();
        }
    }
}

impl MessageTransport for ScriptedTransport {
    fn deliver(&self, message: OutgoingMessage) -> impl Future<Output = Scripted> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            let call = inner.calls.fetch_add(1, Ordering::SeqCst) + 1;
            lock(&inner.sent).push(message);
            tracing::debug!(call, "scripted transport received message");

            if let Some(gate) = &inner.gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }

            let scripted = lock(&inner.script).pop_front();
            scripted.unwrap_or_else(|| {
                Ok(TransportReply {
                    message_id: format!("srv-ai-{call}"),
                    user_message_id: Some(format!("srv-user-{call}")),
                    ai_reply_text: DEFAULT_REPLY.to_owned(),
                    crisis_detected_by_server: false,
                })
            })
        }
    }
}
