//! Progress reporting from a worker thread to whoever started the run.
//!
//! A run produces an ordered stream of [`ProgressEvent`]s followed by exactly
//! one terminal value. The caller drains it through a [`RunHandle`], either
//! blocking (`Iterator`) or polling (`try_next_event`) from a UI loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// 0-100, never decreasing within one run.
    pub percent: u8,
    pub message: String,
}

enum Message<T> {
    Progress(ProgressEvent),
    Finished(Result<T>),
}

/// Cooperative cancellation flag shared between a caller and a run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Wraps a progress callback and keeps the reported percentage monotonic.
pub(crate) struct Reporter<'a> {
    sink: &'a mut dyn FnMut(ProgressEvent),
    percent: u8,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(sink: &'a mut dyn FnMut(ProgressEvent)) -> Self {
        Self { sink, percent: 0 }
    }

    pub(crate) fn report(&mut self, percent: u8, message: impl Into<String>) {
        self.percent = self.percent.max(percent.min(100));
        (self.sink)(ProgressEvent {
            percent: self.percent,
            message: message.into(),
        });
    }

    /// Report a message at the current percentage.
    pub(crate) fn note(&mut self, message: impl Into<String>) {
        let percent = self.percent;
        self.report(percent, message);
    }

    pub(crate) fn percent(&self) -> u8 {
        self.percent
    }
}

/// Handle to a run executing on its own worker thread.
pub struct RunHandle<T> {
    rx: mpsc::Receiver<Message<T>>,
    outcome: Option<Result<T>>,
    worker: Option<JoinHandle<()>>,
    cancel: CancelToken,
}

impl<T: Send + 'static> RunHandle<T> {
    pub(crate) fn spawn<F>(name: &str, cancel: CancelToken, job: F) -> Result<Self>
    where
        F: FnOnce(&mut dyn FnMut(ProgressEvent)) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Message<T>>();
        let worker = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let progress_tx = tx.clone();
                let mut sink = move |event: ProgressEvent| {
                    let _ = progress_tx.send(Message::Progress(event));
                };
                let result = job(&mut sink);
                let _ = tx.send(Message::Finished(result));
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            rx,
            outcome: None,
            worker: Some(worker),
            cancel,
        })
    }
}

impl<T> RunHandle<T> {
    /// Block until the next event. `None` once the run has finished.
    pub fn next_event(&mut self) -> Option<ProgressEvent> {
        if self.outcome.is_some() {
            return None;
        }
        match self.rx.recv() {
            Ok(msg) => self.accept(msg),
            Err(_) => {
                self.outcome = Some(Err(Error::WorkerLost));
                None
            }
        }
    }

    /// Non-blocking variant of [`next_event`](Self::next_event) for polling
    /// from an event loop.
    pub fn try_next_event(&mut self) -> Option<ProgressEvent> {
        if self.outcome.is_some() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(msg) => self.accept(msg),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.outcome = Some(Err(Error::WorkerLost));
                None
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Ask the run to stop at the next stage boundary or item.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Discard any remaining events and return the terminal value.
    pub fn wait(mut self) -> Result<T> {
        while self.next_event().is_some() {}
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.outcome.take().unwrap_or(Err(Error::WorkerLost))
    }

    fn accept(&mut self, msg: Message<T>) -> Option<ProgressEvent> {
        match msg {
            Message::Progress(event) => Some(event),
            Message::Finished(result) => {
                self.outcome = Some(result);
                None
            }
        }
    }
}

impl<T> Iterator for RunHandle<T> {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        self.next_event()
    }
}

impl<T> std::fmt::Debug for RunHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("finished", &self.outcome.is_some())
            .finish()
    }
}
