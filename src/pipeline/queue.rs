//! Bounded FIFO between the list reader and the workers.
//!
//! A ring buffer with head/tail/count under one mutex, plus three condition variables:
//! `not_full` (producer waits), `not_empty` (workers wait) and `stopped` (coordinator waits
//! for end-of-stream with an empty queue).

use anyhow::{Result, ensure};
use parking_lot::{Condvar, Mutex};

use crate::Job;

/// Result of [`BoundedJobQueue::dequeue`].
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeued<T> {
    Item(T),
    /// The producer has finished and every item has been taken.
    EndOfStream,
}

struct Ring<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
    /// Set once by the producer; never reset.
    ended: bool,
    stopped_workers: usize,
}

pub struct BoundedJobQueue<T = Job> {
    state: Mutex<Ring<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    stopped: Condvar,
    capacity: usize,
}

impl<T> BoundedJobQueue<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        ensure!(capacity >= 1, "queue capacity must be at least 1");
        Ok(Self {
            state: Mutex::new(Ring {
                slots: (0..capacity).map(|_| None).collect(),
                head: 0,
                tail: 0,
                count: 0,
                ended: false,
                stopped_workers: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            stopped: Condvar::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_ended(&self) -> bool {
        self.state.lock().ended
    }

    /// Insert at the tail, blocking while the queue is full.
    pub fn enqueue(&self, item: T) {
        let mut ring = self.state.lock();
        while ring.count == self.capacity {
            self.not_full.wait(&mut ring);
        }
        let tail = ring.tail;
        ring.slots[tail] = Some(item);
        ring.tail = (tail + 1) % self.capacity;
        ring.count += 1;
        self.not_empty.notify_one();
    }

    /// Take the head item, blocking while the queue is empty and not ended.
    pub fn dequeue(&self) -> Dequeued<T> {
        let mut ring = self.state.lock();
        loop {
            if ring.count > 0 {
                let head = ring.head;
                let item = ring.slots[head].take();
                ring.head = (head + 1) % self.capacity;
                ring.count -= 1;
                self.not_full.notify_one();
                if ring.count == 0 && ring.ended {
                    self.stopped.notify_all();
                }
                match item {
                    Some(item) => return Dequeued::Item(item),
                    // count > 0 guarantees the head slot is filled
                    None => unreachable!("ring slot {head} empty with count > 0"),
                }
            }
            if ring.ended {
                return Dequeued::EndOfStream;
            }
            self.not_empty.wait(&mut ring);
        }
    }

    /// Mark end of stream and wake every waiting worker.
    pub fn signal_end(&self) {
        let mut ring = self.state.lock();
        ring.ended = true;
        self.not_empty.notify_all();
        self.stopped.notify_all();
    }

    /// Called by a worker on its way out after seeing [`Dequeued::EndOfStream`].
    pub fn worker_stopped(&self) {
        let mut ring = self.state.lock();
        ring.stopped_workers += 1;
        self.stopped.notify_all();
    }

    /// Block until the producer has ended and the queue is empty.
    /// Returns how many workers had announced they stopped by then.
    pub fn wait_drained(&self) -> usize {
        let mut ring = self.state.lock();
        while !ring.ended || ring.count > 0 {
            self.stopped.wait(&mut ring);
        }
        ring.stopped_workers
    }
}
