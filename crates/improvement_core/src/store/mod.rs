//! Serialized state container with derived-view subscriptions.
//!
//! # Responsibility
//! - Own the canonical `AppState` and apply commands one at a time.
//! - Push derived values to subscribers after each committed command.
//!
//! # Invariants
//! - Every command is applied atomically under a single lock.
//! - Subscribers are notified before the lock is released, so every
//!   subscriber observes commits in commit order.
//! - A new subscription immediately receives the current derived value.
//! - Consecutive equal derived values are emitted once.

pub mod action;
pub mod reducer;
pub mod selectors;

use crate::model::improvement::ImprovementState;
use crate::model::metric::MetricState;
use action::Action;
use log::debug;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Root state owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub improvement: ImprovementState,
    pub metric: MetricState,
}

type Listener = Box<dyn FnMut(&AppState) -> bool + Send>;

struct StoreInner {
    state: AppState,
    listeners: Vec<Listener>,
}

/// Explicitly constructed store, shared by reference (usually `Arc<Store>`).
pub struct Store {
    inner: Mutex<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                state,
                listeners: Vec::new(),
            }),
        }
    }

    /// Applies one command and notifies subscribers if state changed.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let name = action.name();
        let mut inner = self.lock();
        let changed = reducer::reduce(&mut inner.state, action);
        if changed {
            let StoreInner { state, listeners } = &mut *inner;
            let state = &*state;
            // Listeners whose receiving side was dropped are pruned here.
            listeners.retain_mut(|listener| listener(state));
        }
        debug!(
            "event=dispatch module=store status=ok action={} changed={} subscribers={}",
            name,
            changed,
            inner.listeners.len()
        );
    }

    /// Subscribes to a derived view of the state.
    pub fn select<T, F>(&self, selector: F) -> Selection<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&AppState) -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();
        let mut last = selector(&inner.state);
        // The receiver is still in scope, so this send cannot fail.
        let _ = tx.send(last.clone());
        inner.listeners.push(Box::new(move |state| {
            let next = selector(state);
            if next == last {
                return true;
            }
            last = next.clone();
            tx.send(next).is_ok()
        }));
        Selection { rx, current: None }
    }

    /// Clones the current state.
    pub fn snapshot(&self) -> AppState {
        self.lock().state.clone()
    }

    /// Reads the current state without cloning it.
    pub fn with_state<R>(&self, read: impl FnOnce(&AppState) -> R) -> R {
        read(&self.lock().state)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A panicking selector must not make the store unusable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Continuously updated derived view. Dropping it unsubscribes.
pub struct Selection<T> {
    rx: Receiver<T>,
    current: Option<T>,
}

impl<T: Clone> Selection<T> {
    /// Drains pending emissions and returns the newest value seen so far.
    pub fn latest(&mut self) -> Option<T> {
        while let Ok(value) = self.rx.try_recv() {
            self.current = Some(value);
        }
        self.current.clone()
    }

    /// Blocks for the next emission. `None` once the store is gone.
    pub fn recv(&mut self) -> Option<T> {
        let value = self.rx.recv().ok()?;
        self.current = Some(value.clone());
        Some(value)
    }

    /// Returns the next pending emission without blocking.
    pub fn try_recv(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => {
                self.current = Some(value.clone());
                Some(value)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => {
                self.current = Some(value.clone());
                Some(value)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// All emissions pending right now, oldest first.
    pub fn pending(&mut self) -> Vec<T> {
        let values = self.rx.try_iter().collect::<Vec<_>>();
        if let Some(last) = values.last() {
            self.current = Some(last.clone());
        }
        values
    }
}
