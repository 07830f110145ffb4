// src/concurrent/queue.rs

//! Shared blocking queue consumed by multiple workers.
//!
//! `std::sync::mpsc` has a single consumer, and parking a receiver behind a
//! mutex would wedge the controller's pre-shutdown drain while a worker
//! blocks inside `recv` holding the lock. A mutex-plus-condvar queue gives
//! every handle blocking `pop`, non-blocking `try_pop` and `push`; the Exit
//! re-broadcast also needs `push` from the consuming side.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

pub struct SharedQueue<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    items: Mutex<VecDeque<T>>,
    ready: Condvar,
}

impl<T> SharedQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(VecDeque::new()),
                ready: Condvar::new(),
            }),
        }
    }

    pub fn push(&self, value: T) {
        let mut items = self.inner.items.lock().unwrap();
        items.push_back(value);
        self.inner.ready.notify_one();
    }

    /// Block until a value is available.
    pub fn pop(&self) -> T {
        let mut items = self.inner.items.lock().unwrap();
        loop {
            if let Some(value) = items.pop_front() {
                return value;
            }
            items = self.inner.ready.wait(items).unwrap();
        }
    }

    /// Take the next value if one is queued.
    pub fn try_pop(&self) -> Option<T> {
        self.inner.items.lock().unwrap().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.lock().unwrap().is_empty()
    }
}

impl<T> Clone for SharedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
