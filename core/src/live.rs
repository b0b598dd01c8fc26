//! Observable holder for one operation's `AsyncResult`.
//!
//! A `LiveResult` keeps the latest value of its operation. Observers attach
//! with `observe_once`: they see the current value and every later one up
//! to and including the first terminal value, then they are retired. An
//! observer whose `Lifecycle` has been destroyed is dropped without being
//! called.
//!
//! Values are set from tasks the UI thread runs (see `looper`), so observer
//! callbacks always execute on the UI thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::result::AsyncResult;

/// Liveness token for a screen. Clones share state; `destroy` on any clone
/// turns pending deliveries for all of them into no-ops.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    alive: Arc<AtomicBool>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn destroy(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

type Callback<T> = Box<dyn FnMut(&AsyncResult<T>) + Send + 'static>;

struct Observer<T> {
    lifecycle: Lifecycle,
    callback: Callback<T>,
}

impl<T> Observer<T> {
    /// Returns whether the observer stays subscribed.
    fn deliver(&mut self, value: &AsyncResult<T>) -> bool {
        if !self.lifecycle.is_alive() {
            return false;
        }
        (self.callback)(value);
        !value.is_terminal()
    }
}

struct Inner<T> {
    value: Option<AsyncResult<T>>,
    observers: Vec<Observer<T>>,
}

pub struct LiveResult<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for LiveResult<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> LiveResult<T> {
    /// A holder with no value yet.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: None,
                observers: Vec::new(),
            })),
        }
    }

    /// A holder already in `Loading`.
    pub fn loading() -> Self {
        let live = Self::new();
        live.lock().value = Some(AsyncResult::Loading);
        live
    }

    pub fn value(&self) -> Option<AsyncResult<T>> {
        self.lock().value.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Publish a new value to every live observer. Terminal values are
    /// sticky: once one is set, later values are ignored.
    pub fn set_value(&self, value: AsyncResult<T>) {
        let mut observers = {
            let mut inner = self.lock();
            if inner.value.as_ref().is_some_and(|v| v.is_terminal()) {
                tracing::debug!("ignoring value published after terminal result");
                return;
            }
            inner.value = Some(value.clone());
            std::mem::take(&mut inner.observers)
        };

        // Callbacks run outside the lock so they may observe again.
        observers.retain_mut(|observer| observer.deliver(&value));

        let mut inner = self.lock();
        observers.append(&mut inner.observers);
        inner.observers = observers;
    }

    /// Subscribe until the first terminal value has been delivered.
    ///
    /// If a value is already present it is delivered immediately; a
    /// terminal value delivered this way retires the subscription at once.
    pub fn observe_once(
        &self,
        lifecycle: &Lifecycle,
        callback: impl FnMut(&AsyncResult<T>) + Send + 'static,
    ) {
        let mut observer = Observer {
            lifecycle: lifecycle.clone(),
            callback: Box::new(callback),
        };
        let current = self.lock().value.clone();
        let keep = match current {
            Some(value) => observer.deliver(&value),
            None => lifecycle.is_alive(),
        };
        if keep {
            self.lock().observers.push(observer);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone + Send + 'static> Default for LiveResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn recorder<T: Clone + Send + 'static>() -> (
        impl FnMut(&AsyncResult<T>) + Send + 'static,
        mpsc::Receiver<AsyncResult<T>>,
    ) {
        let (tx, rx) = mpsc::channel();
        (move |r: &AsyncResult<T>| tx.send(r.clone()).unwrap(), rx)
    }

    #[test]
    fn observer_sees_loading_then_terminal() {
        let live = LiveResult::<u32>::loading();
        let lifecycle = Lifecycle::new();
        let (callback, rx) = recorder::<u32>();
        live.observe_once(&lifecycle, callback);
        assert_eq!(live.observer_count(), 1);

        live.set_value(AsyncResult::Success(5));
        let seen: Vec<_> = rx.try_iter().collect();
        assert_eq!(seen, vec![AsyncResult::Loading, AsyncResult::Success(5)]);
        assert_eq!(live.observer_count(), 0);
    }

    #[test]
    fn terminal_value_is_delivered_once_per_subscription() {
        let live = LiveResult::<u32>::loading();
        let lifecycle = Lifecycle::new();
        let (first, rx1) = recorder::<u32>();
        let (second, rx2) = recorder::<u32>();
        live.observe_once(&lifecycle, first);
        live.observe_once(&lifecycle, second);

        live.set_value(AsyncResult::Error("boom".to_string()));
        live.set_value(AsyncResult::Error("again".to_string()));

        let terminal = |rx: &mpsc::Receiver<AsyncResult<u32>>| {
            rx.try_iter().filter(|r| r.is_terminal()).count()
        };
        assert_eq!(terminal(&rx1), 1);
        assert_eq!(terminal(&rx2), 1);
    }

    #[test]
    fn late_subscriber_gets_completed_value_once() {
        let live = LiveResult::<u32>::loading();
        live.set_value(AsyncResult::Success(9));
        let lifecycle = Lifecycle::new();
        let (callback, rx) = recorder::<u32>();
        live.observe_once(&lifecycle, callback);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![AsyncResult::Success(9)]);
        assert_eq!(live.observer_count(), 0);

        // A second subscription is independent and also sees it once.
        let (callback, rx) = recorder::<u32>();
        live.observe_once(&lifecycle, callback);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn destroyed_lifecycle_suppresses_delivery() {
        let live = LiveResult::<u32>::loading();
        let lifecycle = Lifecycle::new();
        let (callback, rx) = recorder::<u32>();
        live.observe_once(&lifecycle, callback);
        let _ = rx.try_recv();

        lifecycle.destroy();
        live.set_value(AsyncResult::Success(1));
        assert!(rx.try_recv().is_err());
        assert_eq!(live.observer_count(), 0);
    }

    #[test]
    fn subscribing_with_dead_lifecycle_is_noop() {
        let live = LiveResult::<u32>::new();
        let lifecycle = Lifecycle::new();
        lifecycle.destroy();
        let (callback, rx) = recorder::<u32>();
        live.observe_once(&lifecycle, callback);
        assert_eq!(live.observer_count(), 0);
        live.set_value(AsyncResult::Success(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn callback_may_resubscribe() {
        let live = LiveResult::<u32>::loading();
        let lifecycle = Lifecycle::new();
        let (tx, rx) = mpsc::channel();
        let again = live.clone();
        let inner_lifecycle = lifecycle.clone();
        live.observe_once(&lifecycle, move |r| {
            if r.is_terminal() {
                let tx = tx.clone();
                again.observe_once(&inner_lifecycle, move |r| tx.send(r.clone()).unwrap());
            }
        });
        live.set_value(AsyncResult::Success(3));
        assert_eq!(rx.try_recv().unwrap(), AsyncResult::Success(3));
    }
}
