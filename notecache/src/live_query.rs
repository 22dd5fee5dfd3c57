use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use futures::{Stream, StreamExt, stream};
use log::{trace, warn};
use tokio::sync::oneshot;

type SnapshotStream<T> = Pin<Box<dyn Stream<Item=Vec<T>> + Send>>;

/// A continuously updated query result.
///
/// Yields the current snapshot first and a fresh one after every relevant
/// change, until cancelled or dropped. Consecutive changes may be coalesced,
/// but the last snapshot yielded always reflects the latest state.
pub struct LiveQuery<T> {
    stream: Option<SnapshotStream<T>>,
}

impl<T: Send + 'static> LiveQuery<T> {
    pub fn new(stream: impl Stream<Item=Vec<T>> + Send + 'static) -> Self {
        LiveQuery {
            stream: Some(Box::pin(stream)),
        }
    }

    /// Yields `snapshot` once and then stays open without ever changing.
    pub fn constant(snapshot: Vec<T>) -> Self {
        Self::new(
            stream::once(async move { snapshot })
                .chain(stream::pending())
        )
    }

    pub fn map<U: Send + 'static>(
        self,
        mut f: impl FnMut(T) -> U + Send + 'static,
    ) -> LiveQuery<U> {
        LiveQuery {
            stream: self.stream.map(|stream| -> SnapshotStream<U> {
                Box::pin(
                    stream.map(move |snapshot| {
                        snapshot.into_iter().map(&mut f).collect()
                    })
                )
            }),
        }
    }

    /// Stops the query and releases what it holds. Calling it again is a
    /// no-op.
    pub fn cancel(&mut self) {
        if self.stream.take().is_some() {
            trace!("live query cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.stream.is_none()
    }

    /// Drives the query on a background task, calling `on_snapshot` for every
    /// snapshot until the returned handle is cancelled or dropped.
    ///
    /// Must be called within a tokio runtime.
    pub fn subscribe(
        mut self,
        on_snapshot: impl FnMut(Vec<T>) + Send + 'static,
    ) -> SubscriptionHandle {
        let on_snapshot: Box<dyn FnMut(Vec<T>) + Send> = Box::new(on_snapshot);
        let callback: SharedCallback<T> = Arc::new(Mutex::new(Some(on_snapshot)));
        let (die_notice_sender, mut die_notice) = oneshot::channel();
        let task_callback = callback.clone();
        tokio::spawn(async move {
            trace!("subscription started");
            loop {
                let snapshot = tokio::select! {
                    biased;
                    _ = &mut die_notice => break,
                    snapshot = self.next() => match snapshot {
                        Some(snapshot) => snapshot,
                        None => break,
                    },
                };
                let Ok(mut callback) = task_callback.lock() else {
                    warn!("subscription callback panicked earlier, stopping");
                    break
                };
                match callback.as_mut() {
                    Some(callback) => callback(snapshot),
                    None => break,
                }
            }
            self.cancel();
            trace!("subscription finished");
        });
        let release_callback: Box<dyn FnOnce() + Send> = Box::new(move || {
            let released = match callback.lock() {
                Ok(mut callback) => callback.take(),
                Err(poisoned) => poisoned.into_inner().take(),
            };
            drop(released);
        });
        SubscriptionHandle {
            release_callback: Some(release_callback),
            die_notice: Some(die_notice_sender),
        }
    }
}

impl<T> Stream for LiveQuery<T> {
    type Item = Vec<T>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Vec<T>>> {
        match self.get_mut().stream.as_mut() {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl<T> Debug for LiveQuery<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQuery")
            .field("cancelled", &self.stream.is_none())
            .finish()
    }
}

type SharedCallback<T> = Arc<Mutex<Option<Box<dyn FnMut(Vec<T>) + Send>>>>;

/// Keeps a [`LiveQuery::subscribe`] subscription alive.
///
/// Once [`SubscriptionHandle::cancel`] returns, the callback is never called
/// again. It must not be called from inside the callback itself.
pub struct SubscriptionHandle {
    release_callback: Option<Box<dyn FnOnce() + Send>>,
    die_notice: Option<oneshot::Sender<()>>,
}

impl SubscriptionHandle {
    pub fn cancel(&mut self) {
        let Some(die_notice) = self.die_notice.take() else {
            return
        };
        // the task may already be gone if the query ended on its own
        let _ = die_notice.send(());
        if let Some(release_callback) = self.release_callback.take() {
            release_callback();
        }
        trace!("subscription cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.die_notice.is_none()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel()
    }
}
