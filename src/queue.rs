//! Bounded multi-producer/multi-consumer FIFO with producer registration.
//!
//! The queue tracks how many producers are currently attached. `dequeue` can
//! then tell "temporarily empty" (producers remain, block for the next item)
//! apart from "exhausted" (empty with zero producers, return `None`) without
//! polling. Every producer registers before its first `enqueue` and
//! unregisters after its last; [`ProducerGuard`] does both ends of that as an
//! RAII pair, so a producer that panics or is cancelled still releases the
//! queue and never strands a blocked consumer.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

struct QueueState<T> {
    buf: VecDeque<T>,
    producers: usize,
}

/// Fixed-capacity blocking FIFO shared by any number of producer and consumer
/// threads. All operations take `&self`; share it behind an `Arc`.
pub struct BoundedQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is 0: a zero-capacity queue can never accept an
    /// item, so every producer would block forever.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "queue capacity must be at least 1");
        BoundedQueue {
            capacity,
            state: Mutex::new(QueueState {
                buf: VecDeque::with_capacity(capacity),
                producers: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Attach a producer. Consumers keep blocking on an empty queue as long as
    /// at least one producer is attached. Must be called before the producer's
    /// first `enqueue`; prefer [`ProducerGuard::register`], which pairs this
    /// with the matching unregister automatically.
    pub fn register_producer(&self) {
        let mut state = self.state.lock().unwrap();
        state.producers += 1;
    }

    /// Detach a producer. When the last producer detaches and the queue is
    /// empty, all blocked consumers wake up and observe end-of-stream.
    ///
    /// Unregistering more times than registered is a caller bug; the count
    /// saturates at zero and the queue stays consistent.
    pub fn unregister_producer(&self) {
        let mut state = self.state.lock().unwrap();
        match state.producers.checked_sub(1) {
            Some(n) => state.producers = n,
            None => {
                log::error!("unregister_producer called with no registered producers");
                return;
            }
        }
        if state.producers == 0 {
            // Consumers only sleep on an empty queue, but a broadcast on a
            // non-empty one is harmless: every waiter re-checks its predicate.
            self.not_empty.notify_all();
        }
    }

    /// Append `item`, blocking while the queue is full.
    pub fn enqueue(&self, item: T) {
        let mut state = self.state.lock().unwrap();
        while state.buf.len() == self.capacity {
            state = self.not_full.wait(state).unwrap();
        }
        state.buf.push_back(item);
        drop(state);
        self.not_empty.notify_one();
    }

    /// Remove and return the oldest item.
    ///
    /// On an empty queue this blocks while any producer is registered, waking
    /// when an item arrives or the last producer unregisters. Returns `None`
    /// (end-of-stream) once the queue is empty with zero producers; a consumer
    /// woken by an unregister re-checks the predicate before returning, since
    /// another producer may have registered and enqueued in the meantime.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.buf.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.producers == 0 {
                return None;
            }
            state = self.not_empty.wait(state).unwrap();
        }
    }

    /// Number of items currently queued. Snapshot only; may be stale by the
    /// time the caller looks at it.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of items the queue holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently registered producers. Snapshot only.
    pub fn producers(&self) -> usize {
        self.state.lock().unwrap().producers
    }
}

/// RAII producer registration: registers on creation, unregisters on drop.
///
/// The guard owns an `Arc` to the queue, so it can be created on the spawning
/// thread and moved into the worker. Registering before the worker thread even
/// starts is what keeps a downstream consumer from observing a transient
/// "empty with zero producers" and exiting before the stream has begun.
pub struct ProducerGuard<T> {
    queue: Arc<BoundedQueue<T>>,
}

impl<T> ProducerGuard<T> {
    pub fn register(queue: &Arc<BoundedQueue<T>>) -> Self {
        queue.register_producer();
        ProducerGuard {
            queue: Arc::clone(queue),
        }
    }
}

impl<T> Drop for ProducerGuard<T> {
    fn drop(&mut self) {
        self.queue.unregister_producer();
    }
}
